/// Registry of the object classes a labeling pass works with.
///
/// Class indices are 1-based: index 0 is reserved for the background label.
/// The registry also carries the per-class mean `[l, w, h]` used as the size
/// reference by the bin-based target encoder, so no ambient dataset state is
/// consulted anywhere in the pipeline.
#[derive(Debug, Clone)]
pub struct ClassMap {
    names: Vec<String>,
    mean_sizes: Vec<[f64; 3]>,
}

impl ClassMap {
    /// Create a registry from class names and their mean sizes.
    ///
    /// Both slices must have the same length.
    pub fn new(names: Vec<String>, mean_sizes: Vec<[f64; 3]>) -> Self {
        assert_eq!(names.len(), mean_sizes.len());
        Self { names, mean_sizes }
    }

    /// Number of classes, background excluded.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the registry holds no classes.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 1-based index of a class name, or `None` for unknown names.
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| i as u32 + 1)
    }

    /// Class name for a 1-based index, or `None` for 0 and out-of-range
    /// indices.
    pub fn name_of(&self, index: u32) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.names.get(index as usize - 1).map(String::as_str)
    }

    /// Mean `[l, w, h]` for a 1-based class index.
    pub fn mean_size(&self, index: u32) -> Option<[f64; 3]> {
        if index == 0 {
            return None;
        }
        self.mean_sizes.get(index as usize - 1).copied()
    }

    /// Identifier of the class set, used to key persisted label files.
    ///
    /// Single-class sets use the class name; multi-class sets join the names
    /// with `_` in registry order.
    pub fn set_name(&self) -> String {
        self.names.join("_")
    }
}
