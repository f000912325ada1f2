use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::FacetError;

/// Tag carried by every catalog item; also the name of the catch-all facet.
pub const WILDCARD_TAG: &str = "all";

/// Career roles the portal organises content around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    BusinessAnalyst,
    DataAnalyst,
    DataScientist,
    ProductManager,
    QaEngineer,
    SoftwareEngineer,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::BusinessAnalyst,
        Role::DataAnalyst,
        Role::DataScientist,
        Role::ProductManager,
        Role::QaEngineer,
        Role::SoftwareEngineer,
    ];

    /// Short tag used in card role attributes.
    pub fn tag(&self) -> &'static str {
        match self {
            Role::BusinessAnalyst => "ba",
            Role::DataAnalyst => "da",
            Role::DataScientist => "ds",
            Role::ProductManager => "pm",
            Role::QaEngineer => "qa",
            Role::SoftwareEngineer => "se",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Role> {
        Role::ALL.iter().copied().find(|r| r.tag() == tag)
    }
}

/// The single active filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterFacet {
    #[default]
    All,
    Role(Role),
}

impl FilterFacet {
    pub fn tag(&self) -> &'static str {
        match self {
            FilterFacet::All => WILDCARD_TAG,
            FilterFacet::Role(role) => role.tag(),
        }
    }

    /// Every selectable facet, in filter-bar order.
    pub fn all_facets() -> Vec<FilterFacet> {
        std::iter::once(FilterFacet::All)
            .chain(Role::ALL.iter().copied().map(FilterFacet::Role))
            .collect()
    }
}

impl fmt::Display for FilterFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FilterFacet {
    type Err = FacetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag == WILDCARD_TAG {
            return Ok(FilterFacet::All);
        }
        Role::from_tag(tag)
            .map(FilterFacet::Role)
            .ok_or_else(|| FacetError(s.to_string()))
    }
}

impl TryFrom<String> for FilterFacet {
    type Error = FacetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilterFacet> for String {
    fn from(facet: FilterFacet) -> Self {
        facet.tag().to_string()
    }
}
