use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// External representation of an item's dimensions.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtItemDims {
    pub w: u64,
    pub l: u64,
}

/// External representation of a container's dimensions.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtContainerDims {
    #[serde(rename = "W")]
    pub width: u64,
    #[serde(rename = "L")]
    pub length: u64,
}

/// Id-keyed item set; iteration order is insertion order and is the base
/// item order of the search.
pub type ExtItems = IndexMap<String, ExtItemDims>;

/// Id-keyed container set; iteration order is the packing order.
pub type ExtContainers = IndexMap<String, ExtContainerDims>;

/// External representation of a solution.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSolution {
    /// Per container, per item: `[Xo, Yo, w, l]` with the dimensions as
    /// placed (reflecting rotation).
    pub placements: IndexMap<String, IndexMap<String, [u64; 4]>>,
    /// Per container: fraction of its area covered by placements.
    pub utilization: IndexMap<String, f64>,
    /// Final imaginary height, strip-packing solutions only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_height: Option<u64>,
}
