use std::sync::Mutex;

use log::warn;

/// Receives advisory events raised while decoding. Never blocks decoding.
pub trait Diagnostics: Send + Sync {
    fn missing_field_metadata(&self, field: &str);
}

/// Default sink: forwards warnings to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn missing_field_metadata(&self, field: &str) {
        warn!("field {field} not found in table metadata");
    }
}

/// Records every missing field it is told about, in arrival order.
/// Built with [`CollectingDiagnostics::logging`] it also warns through
/// [`LogDiagnostics`].
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    missing: Mutex<Vec<String>>,
    forward_to_log: bool,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logging() -> Self {
        Self {
            forward_to_log: true,
            ..Self::default()
        }
    }

    pub fn missing_fields(&self) -> Vec<String> {
        self.missing
            .lock()
            .map(|fields| fields.clone())
            .unwrap_or_default()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn missing_field_metadata(&self, field: &str) {
        if self.forward_to_log {
            LogDiagnostics.missing_field_metadata(field);
        }
        if let Ok(mut fields) = self.missing.lock() {
            fields.push(field.to_string());
        }
    }
}

impl<T: Diagnostics + ?Sized> Diagnostics for std::sync::Arc<T> {
    fn missing_field_metadata(&self, field: &str) {
        (**self).missing_field_metadata(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_diagnostics_keeps_arrival_order() {
        let sink = CollectingDiagnostics::new();
        sink.missing_field_metadata("B");
        sink.missing_field_metadata("A");
        assert_eq!(sink.missing_fields(), vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn logging_sink_still_records() {
        let sink = CollectingDiagnostics::logging();
        sink.missing_field_metadata("Mystery");
        assert_eq!(sink.missing_fields(), vec!["Mystery".to_string()]);
    }
}
