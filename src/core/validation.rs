use super::error::{RpsError, ValidationError};
use super::schema::{DocumentSink, walk};
use super::types::{IssuerConfig, Rps};

/// Check an RPS against the document layout without rendering it.
/// Returns all validation errors found (not just the first), in document
/// order.
pub fn validate_rps(rps: &Rps, issuer: Option<&IssuerConfig>) -> Vec<ValidationError> {
    let mut collector = Collector::default();
    // The collector never aborts the walk.
    let _ = walk(rps, issuer, &mut collector);
    collector.errors
}

#[derive(Default)]
struct Collector {
    errors: Vec<ValidationError>,
}

impl DocumentSink for Collector {
    fn start(&mut self, _tag: &'static str, _attrs: &[(&str, &str)]) -> Result<(), RpsError> {
        Ok(())
    }

    fn end(&mut self, _tag: &'static str) -> Result<(), RpsError> {
        Ok(())
    }

    fn empty(&mut self, _tag: &'static str) -> Result<(), RpsError> {
        Ok(())
    }

    fn leaf(&mut self, _tag: &'static str, _text: &str) -> Result<(), RpsError> {
        Ok(())
    }

    fn violation(&mut self, err: RpsError) -> Result<(), RpsError> {
        self.errors.push(err.into());
        Ok(())
    }
}
