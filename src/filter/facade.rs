use crate::envelope::EnvelopeRef;
use crate::error::Result;
use crate::filter::{Filter, FilterKind, Lp12};

/// Facade selecting a concrete filter implementation by kind at construction.
///
/// Lowpass and Lp12 both map to the [`Lp12`] implementation; the remaining
/// kinds have no backing filter yet, in which case every forwarded call is a
/// no-op and the parameter getters return `None`.
pub struct IirFilter {
    kind: FilterKind,
    filter: Option<Box<dyn Filter>>,
}

impl IirFilter {
    pub fn new(kind: FilterKind, cutoff: f64, resonance: f64, sample_rate: f64) -> Self {
        let filter: Option<Box<dyn Filter>> = match kind {
            FilterKind::Lowpass | FilterKind::Lp12 => {
                Some(Box::new(Lp12::new(cutoff, resonance, sample_rate)))
            }
            _ => None,
        };

        Self { kind, filter }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn cutoff(&self) -> Option<f64> {
        self.filter.as_ref().map(|f| f.cutoff())
    }

    pub fn resonance(&self) -> Option<f64> {
        self.filter.as_ref().map(|f| f.resonance())
    }

    /// Recompute the selected filter's coefficients.
    pub fn set(&mut self, cutoff: f64, resonance: f64) {
        if let Some(filter) = &mut self.filter {
            filter.calc_coeff(cutoff, resonance);
        }
    }

    pub fn process(&mut self, buffer: &mut [f64]) {
        if let Some(filter) = &mut self.filter {
            filter.process(buffer);
        }
    }

    /// Attach a shared envelope to the selected filter.
    pub fn add_envelope(&mut self, envelope: EnvelopeRef) -> Result<()> {
        if let Some(filter) = &mut self.filter {
            filter.add_envelope(envelope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 44_100.0;

    #[test]
    fn lowpass_and_lp12_select_an_implementation() {
        for kind in [FilterKind::Lowpass, FilterKind::Lp12] {
            let facade = IirFilter::new(kind, 800.0, 0.2, SAMPLE_RATE);
            assert_eq!(facade.cutoff(), Some(800.0));
            assert_eq!(facade.resonance(), Some(0.2));
        }
    }

    #[test]
    fn unbacked_kinds_are_noops() {
        let mut facade = IirFilter::new(FilterKind::Highpass, 800.0, 0.2, SAMPLE_RATE);
        assert_eq!(facade.cutoff(), None);

        let mut buffer = vec![0.25; 64];
        facade.process(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.25));
    }

    #[test]
    fn set_forwards_to_the_selected_filter() {
        let mut facade = IirFilter::new(FilterKind::Lowpass, 800.0, 0.2, SAMPLE_RATE);
        facade.set(1_500.0, 0.4);
        assert_eq!(facade.cutoff(), Some(1_500.0));
        assert_eq!(facade.resonance(), Some(0.4));
    }

    #[test]
    fn process_forwards_to_the_selected_filter() {
        let mut facade = IirFilter::new(FilterKind::Lowpass, 500.0, 0.1, SAMPLE_RATE);
        let mut buffer = vec![1.0; 64];
        facade.process(&mut buffer);
        // The LP12 recursion must have replaced the raw input.
        assert!(buffer.iter().any(|&s| s != 1.0));
    }
}
