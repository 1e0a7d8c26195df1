/// Options fixed when a [`World`](super::World) is constructed.
///
/// ```rust,ignore
/// let world = World::with_config(Config::new().with_max_entities(10_000).with_capacity(1_024));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on simultaneously live entities. Creating one more fails with
    /// [`Error::CapacityExhausted`](crate::ecs::Error::CapacityExhausted).
    pub max_entities: u32,

    /// Entity slots to reserve up front.
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entities: u32::MAX,
            capacity: 0,
        }
    }
}

impl Config {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_max_entities(mut self, max_entities: u32) -> Self {
        self.max_entities = max_entities;
        self
    }

    #[inline]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}
