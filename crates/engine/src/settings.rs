use model::naming::NamingScheme;

/// Records routed into a batch before it rolls over.
pub const DEFAULT_BATCH_CAPACITY: usize = 50_000;

/// Tunables shared by the extraction and deletion orchestrators.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub batch_capacity: usize,
    pub naming: NamingScheme,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            naming: NamingScheme::default(),
        }
    }
}

impl EngineSettings {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.batch_capacity = capacity.max(1);
        self
    }

    pub fn with_naming(mut self, naming: NamingScheme) -> Self {
        self.naming = naming;
        self
    }
}
