//! Registered-type reporting
//!
//! After registration the compiler lists every record type it knows about,
//! unless running quiet. The listing is informational only.

/// Receives the registered-type listing
pub trait Reporter {
    fn registered_type(&mut self, qualified_name: &str, display_name: &str);
}

/// Discards the listing
impl Reporter for () {
    fn registered_type(&mut self, _qualified_name: &str, _display_name: &str) {}
}

/// Logs each registered type at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn registered_type(&mut self, qualified_name: &str, display_name: &str) {
        tracing::info!(qualified_name, display_name, "registered type");
    }
}

/// Keeps the listing in memory
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    pub entries: Vec<(String, String)>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for CollectingReporter {
    fn registered_type(&mut self, qualified_name: &str, display_name: &str) {
        self.entries.push((qualified_name.to_string(), display_name.to_string()));
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn registered_type(&mut self, qualified_name: &str, display_name: &str) {
        (**self).registered_type(qualified_name, display_name)
    }
}

/// Generated name for a qualified type name
///
/// Each dotted segment is UpperCamelCased and the segments are concatenated:
/// `order.line_item` becomes `OrderLineItem`.
pub fn display_name(qualified_name: &str) -> String {
    qualified_name
        .split('.')
        .flat_map(|segment| segment.split('_'))
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
