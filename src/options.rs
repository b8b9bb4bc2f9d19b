use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolatorOptions
{
    /// Resolve dimension-specialized kernels where available. When off every call
    /// shape uses the dimension-generic kernels.
    pub runtime_optimization: bool,
}

impl Default for InterpolatorOptions
{
    fn default() -> Self {
        Self { runtime_optimization: true }
    }
}
