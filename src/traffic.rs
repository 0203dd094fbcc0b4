//! Experiment variants and their traffic split.

use thiserror::Error;

use crate::model::Variant;

pub const CONTROL: &str = "Control";
/// Required sum of all allocations.
pub const FULL_TRAFFIC: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrafficError {
    #[error("The Control variant cannot be removed")]
    ControlLocked,
    #[error("No variant at position {0}")]
    OutOfRange(usize),
    #[error("Traffic allocation must total 100% (currently {0}%)")]
    NotFull(u32),
    #[error("Invalid variants: {0}")]
    Decode(String),
}

/// Ordered variant list with a live allocation total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantSet {
    variants: Vec<Variant>,
}

impl Default for VariantSet {
    /// `Control 50` / `Variant A 50`.
    fn default() -> Self {
        Self {
            variants: vec![Variant::new(CONTROL, 50), Variant::new("Variant A", 50)],
        }
    }
}

impl VariantSet {
    pub fn from_variants(variants: Vec<Variant>) -> Self {
        Self { variants }
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Variant> {
        self.variants.get_mut(index)
    }

    /// Append `Variant <letter>` with 0% traffic; returns its index.
    pub fn add_variant(&mut self) -> usize {
        let name = format!("Variant {}", variant_letter(self.variants.len()));
        self.variants.push(Variant::new(name, 0));
        self.variants.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Result<Variant, TrafficError> {
        let variant = self
            .variants
            .get(index)
            .ok_or(TrafficError::OutOfRange(index))?;
        if is_control(variant) {
            return Err(TrafficError::ControlLocked);
        }
        Ok(self.variants.remove(index))
    }

    pub fn set_allocation(&mut self, index: usize, percent: u32) -> Result<(), TrafficError> {
        let variant = self
            .variants
            .get_mut(index)
            .ok_or(TrafficError::OutOfRange(index))?;
        variant.traffic_allocation = percent.min(FULL_TRAFFIC);
        Ok(())
    }

    pub fn total(&self) -> u32 {
        self.variants
            .iter()
            .fold(0, |total: u32, variant| total.saturating_add(variant.traffic_allocation))
    }

    pub fn is_valid(&self) -> bool {
        self.total() == FULL_TRAFFIC
    }

    pub fn has_control(&self) -> bool {
        self.variants.iter().any(is_control)
    }

    pub fn validate(&self) -> Result<(), TrafficError> {
        let total = self.total();
        if total == FULL_TRAFFIC {
            Ok(())
        } else {
            Err(TrafficError::NotFull(total))
        }
    }

    /// Split traffic as evenly as possible; the remainder goes to the first arms.
    pub fn split_evenly(&mut self) {
        let count = self.variants.len() as u32;
        if count == 0 {
            return;
        }
        let share = FULL_TRAFFIC / count;
        let remainder = (FULL_TRAFFIC % count) as usize;
        for (index, variant) in self.variants.iter_mut().enumerate() {
            variant.traffic_allocation = share + u32::from(index < remainder);
        }
    }

    /// Wire form: a JSON string holding the variant array.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.variants).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn from_json(text: &str) -> Result<Self, TrafficError> {
        serde_json::from_str(text)
            .map(Self::from_variants)
            .map_err(|err| TrafficError::Decode(err.to_string()))
    }
}

fn is_control(variant: &Variant) -> bool {
    variant.name == CONTROL
}

/// `A`..`Z`, then `AA`, `AB`, ... for the variant at `len` (Control at 0 takes no letter).
fn variant_letter(len: usize) -> String {
    let mut n = len.saturating_sub(1);
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}
