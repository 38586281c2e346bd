use serde_json::Value;

/// A named dataset axis.
#[derive(Debug, Clone)]
pub struct DimensionSummary {
    pub name: String,
    pub len: usize,
    pub unlimited: bool,
}

/// Structural metadata of one variable: its dtype, the dimensions it spans,
/// its attributes and the in-memory size of its data.
#[derive(Debug, Clone)]
pub struct VariableSummary {
    pub name: String,
    pub dtype: String,
    pub dims: Vec<String>,
    pub attributes: Vec<(String, Value)>,
    pub nbytes: u64,
}

impl VariableSummary {
    /// A variable named after one of its own dimensions is a coordinate.
    pub fn is_coordinate(&self) -> bool {
        self.dims.iter().any(|dim| dim == &self.name)
    }
}

/// Normalized metadata of one dataset, independent of the backend that
/// produced it.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub source: String,
    pub dimensions: Vec<DimensionSummary>,
    pub variables: Vec<VariableSummary>,
    pub attributes: Vec<(String, Value)>,
}

impl DatasetSummary {
    /// Estimated in-memory size of all variable data, in bytes.
    pub fn nbytes(&self) -> u64 {
        self.variables.iter().map(|var| var.nbytes).sum()
    }

    pub fn coordinates(&self) -> impl Iterator<Item = &VariableSummary> {
        self.variables.iter().filter(|var| var.is_coordinate())
    }

    pub fn data_vars(&self) -> impl Iterator<Item = &VariableSummary> {
        self.variables.iter().filter(|var| !var.is_coordinate())
    }
}
