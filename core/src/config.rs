/// Defines how many threads are used to convert presets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ThreadCount {
    /// No multithreading. Convert every preset on the calling thread.
    None,

    /// Convert presets in a threadpool with an automatically determined thread count.
    /// Please read
    /// [this](https://docs.rs/rayon-core/1.5.0/rayon_core/struct.ThreadPoolBuilder.html#method.num_threads)
    /// for more information about the thread count selection.
    #[default]
    Auto,

    /// Convert presets in a threadpool with the specified thread count.
    Manual(usize),
}

/// Options for converting the presets of a bank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ConvertOptions {
    /// Only presets whose name contains this string are converted.
    /// The match is case sensitive. `None` converts every preset.
    ///
    /// Default: `None`
    pub filter: Option<String>,

    /// Multithreading used for the conversion. Each preset is converted
    /// independently, the results keep the bank's preset order.
    ///
    /// Default: `ThreadCount::Auto`
    pub threading: ThreadCount,
}

impl ConvertOptions {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_threading(mut self, threading: ThreadCount) -> Self {
        self.threading = threading;
        self
    }

    /// Whether a preset called `name` passes the name filter.
    pub fn matches(&self, name: &str) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |filter| name.contains(filter))
    }
}
