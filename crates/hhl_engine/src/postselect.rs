//! Ancilla post-selection over measurement counts
//!
//! Pure bit-level filtering: keep only outcomes with the success bit
//! set, then re-index the surviving bitstrings onto the target clbit
//! positions, summing collisions. Bit positions follow the workspace
//! convention, clbit 0 is the least significant (rightmost) character.
//!
//! An all-failure input yields the synthetic entry `{"0": 0}` instead
//! of an empty map. That entry is a placeholder for downstream fitting
//! code, not a real observation; callers that prefer a hard failure
//! check `is_placeholder` and raise their own error.

use hhl_core::{bit, format_bits, parse_bits, ClbitId, Counts, HhlResult};
use std::collections::HashMap;

/// Filter counts on a success bit and marginalize onto target clbits
///
/// Output bit i of each surviving key is input bit `targets[i]`.
pub fn filter(raw: &Counts, success_bit: ClbitId, targets: &[ClbitId]) -> HhlResult<Counts> {
    let mut filtered: Counts = HashMap::new();
    for (key, &count) in raw {
        let value = parse_bits(key)?;
        if !bit(value, success_bit) {
            continue;
        }
        let mut marginal = 0u64;
        for (i, &t) in targets.iter().enumerate() {
            if bit(value, t) {
                marginal |= 1 << i;
            }
        }
        *filtered
            .entry(format_bits(marginal, targets.len()))
            .or_insert(0) += count;
    }

    if filtered.is_empty() {
        // synthetic degenerate entry, see module docs
        filtered.insert("0".to_string(), 0);
    }
    Ok(filtered)
}

/// Whether filtered counts are the synthetic all-failure placeholder
pub fn is_placeholder(filtered: &Counts) -> bool {
    filtered.values().sum::<u64>() == 0
}

// ============================================================================
// Tests
// ============================================================================
