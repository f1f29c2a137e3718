// Hierarchy Builder - flat rows to processor trees
//
// Pure, single-pass transformation: group by processor, then payment type,
// then deduplicate schemes, preserving first-seen order at every level.
// Never fails: absent payment type / scheme fields are valid input, and the
// same input always yields the same tree.

use crate::model::{FlatRecord, PaymentType, Processor, Scheme};
use std::collections::{HashMap, HashSet};

// ============================================================================
// ACCUMULATORS
// ============================================================================

/// Payment type under construction. `seen_codes` tracks scheme codes already
/// accepted, so later duplicates are dropped in O(1).
struct PaymentGroup {
    payment_type: String,
    schemes: Vec<Scheme>,
    seen_codes: HashSet<String>,
}

/// Processor under construction. `payment_slots` maps a payment type key to
/// its position in `payments`, keeping first-seen order in the Vec.
struct ProcessorGroup {
    processor_id: String,
    processor_name: String,
    partner_code: String,
    payments: Vec<PaymentGroup>,
    payment_slots: HashMap<String, usize>,
}

impl ProcessorGroup {
    /// Start a group from its first row. That row's name and partner code
    /// are taken as representative for the whole group.
    fn from_first_row(row: &FlatRecord) -> Self {
        ProcessorGroup {
            processor_id: row.processor_id.clone(),
            processor_name: row.processor_name.clone(),
            partner_code: row.partner_code.clone(),
            payments: Vec::new(),
            payment_slots: HashMap::new(),
        }
    }

    /// Fold one row into this group. Rows without a payment type contribute
    /// nothing beyond the processor identity; rows without a scheme code
    /// contribute the payment type but no scheme.
    fn absorb(&mut self, row: &FlatRecord) {
        let payment_type = match &row.payment_type {
            Some(pt) => pt,
            None => return,
        };

        let slot = match self.payment_slots.get(payment_type) {
            Some(&slot) => slot,
            None => {
                let slot = self.payments.len();
                self.payments.push(PaymentGroup {
                    payment_type: payment_type.clone(),
                    schemes: Vec::new(),
                    seen_codes: HashSet::new(),
                });
                self.payment_slots.insert(payment_type.clone(), slot);
                slot
            }
        };

        let scheme_code = match &row.scheme_code {
            Some(code) => code,
            None => return,
        };

        let group = &mut self.payments[slot];
        if group.seen_codes.contains(scheme_code) {
            // Duplicate scheme code: keep the first occurrence, drop this
            // row even when the name differs. Matches the source data's
            // uniqueness contract; not an error.
            return;
        }
        group.seen_codes.insert(scheme_code.clone());
        group.schemes.push(Scheme {
            scheme_code: scheme_code.clone(),
            scheme_name: row.scheme_name.clone().unwrap_or_default(),
        });
    }

    fn finish(self) -> Processor {
        Processor {
            processor_id: self.processor_id,
            processor_name: self.processor_name,
            partner_code: self.partner_code,
            payment_types: self
                .payments
                .into_iter()
                .map(|group| PaymentType {
                    payment_type: group.payment_type,
                    schemes: group.schemes,
                })
                .collect(),
        }
    }
}

// ============================================================================
// BUILD
// ============================================================================

/// Transform flat rows into processor trees.
///
/// Output contains exactly one `Processor` per distinct `processor_id`, in
/// the order each id first appears in the input; same rule for payment types
/// within a processor and schemes within a payment type.
pub fn build_hierarchy(records: &[FlatRecord]) -> Vec<Processor> {
    let mut groups: Vec<ProcessorGroup> = Vec::new();
    let mut processor_slots: HashMap<String, usize> = HashMap::new();

    for row in records {
        let slot = match processor_slots.get(&row.processor_id) {
            Some(&slot) => slot,
            None => {
                let slot = groups.len();
                groups.push(ProcessorGroup::from_first_row(row));
                processor_slots.insert(row.processor_id.clone(), slot);
                slot
            }
        };
        groups[slot].absorb(row);
    }

    groups.into_iter().map(ProcessorGroup::finish).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        processor_id: &str,
        processor_name: &str,
        partner_code: &str,
        payment_type: Option<&str>,
        scheme_code: Option<&str>,
        scheme_name: Option<&str>,
    ) -> FlatRecord {
        FlatRecord {
            processor_id: processor_id.to_string(),
            processor_name: processor_name.to_string(),
            partner_code: partner_code.to_string(),
            payment_type: payment_type.map(str::to_string),
            scheme_code: scheme_code.map(str::to_string),
            scheme_name: scheme_name.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(build_hierarchy(&[]).is_empty());
    }

    #[test]
    fn test_reference_scenario() {
        // Mixed rows: duplicate scheme code, scheme-less payment type,
        // payment-less processor.
        let records = vec![
            row("P1", "Proc1", "PC1", Some("card"), Some("S1"), Some("SchemeA")),
            row("P1", "Proc1", "PC1", Some("card"), Some("S2"), Some("SchemeB")),
            row("P1", "Proc1", "PC1", Some("card"), Some("S1"), Some("SchemeA-dup")),
            row("P1", "Proc1", "PC1", Some("wallet"), None, None),
            row("P2", "Proc2", "PC2", None, None, None),
        ];

        let processors = build_hierarchy(&records);

        assert_eq!(processors.len(), 2);

        let p1 = &processors[0];
        assert_eq!(p1.processor_id, "P1");
        assert_eq!(p1.processor_name, "Proc1");
        assert_eq!(p1.partner_code, "PC1");
        assert_eq!(p1.payment_types.len(), 2);

        let card = &p1.payment_types[0];
        assert_eq!(card.payment_type, "card");
        assert_eq!(card.schemes.len(), 2);
        assert_eq!(card.schemes[0].scheme_code, "S1");
        // First occurrence wins: the "SchemeA-dup" row is dropped.
        assert_eq!(card.schemes[0].scheme_name, "SchemeA");
        assert_eq!(card.schemes[1].scheme_code, "S2");

        let wallet = &p1.payment_types[1];
        assert_eq!(wallet.payment_type, "wallet");
        assert!(wallet.schemes.is_empty());

        let p2 = &processors[1];
        assert_eq!(p2.processor_id, "P2");
        assert!(p2.payment_types.is_empty());
    }

    #[test]
    fn test_one_processor_per_distinct_id() {
        let records = vec![
            row("P1", "Proc1", "PC1", Some("card"), Some("S1"), Some("A")),
            row("P2", "Proc2", "PC2", Some("card"), Some("S1"), Some("A")),
            row("P1", "Proc1", "PC1", Some("wallet"), Some("S2"), Some("B")),
            row("P3", "Proc3", "PC3", None, None, None),
            row("P2", "Proc2", "PC2", Some("card"), Some("S3"), Some("C")),
        ];

        let processors = build_hierarchy(&records);

        let ids: Vec<&str> = processors.iter().map(|p| p.processor_id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn test_first_seen_order_of_payment_types() {
        let records = vec![
            row("P1", "Proc1", "PC1", Some("wallet"), Some("S1"), Some("A")),
            row("P1", "Proc1", "PC1", Some("card"), Some("S2"), Some("B")),
            row("P1", "Proc1", "PC1", Some("wallet"), Some("S3"), Some("C")),
            row("P1", "Proc1", "PC1", Some("bank"), None, None),
        ];

        let processors = build_hierarchy(&records);

        let types: Vec<&str> = processors[0]
            .payment_types
            .iter()
            .map(|pt| pt.payment_type.as_str())
            .collect();
        assert_eq!(types, vec!["wallet", "card", "bank"]);
    }

    #[test]
    fn test_scheme_dedup_keeps_first_occurrence() {
        let records = vec![
            row("P1", "Proc1", "PC1", Some("card"), Some("S1"), Some("First")),
            row("P1", "Proc1", "PC1", Some("card"), Some("S1"), Some("Second")),
            row("P1", "Proc1", "PC1", Some("card"), Some("S1"), Some("Third")),
        ];

        let processors = build_hierarchy(&records);

        let schemes = &processors[0].payment_types[0].schemes;
        assert_eq!(schemes.len(), 1);
        assert_eq!(schemes[0].scheme_name, "First");
    }

    #[test]
    fn test_same_scheme_code_allowed_under_different_payment_types() {
        let records = vec![
            row("P1", "Proc1", "PC1", Some("card"), Some("S1"), Some("A")),
            row("P1", "Proc1", "PC1", Some("wallet"), Some("S1"), Some("A")),
        ];

        let processors = build_hierarchy(&records);

        assert_eq!(processors[0].payment_types.len(), 2);
        assert_eq!(processors[0].payment_types[0].schemes.len(), 1);
        assert_eq!(processors[0].payment_types[1].schemes.len(), 1);
    }

    #[test]
    fn test_absent_payment_type_contributes_nothing() {
        let records = vec![
            row("P1", "Proc1", "PC1", None, None, None),
            row("P1", "Proc1", "PC1", None, None, None),
        ];

        let processors = build_hierarchy(&records);

        assert_eq!(processors.len(), 1);
        assert!(processors[0].payment_types.is_empty());
    }

    #[test]
    fn test_absent_scheme_code_yields_empty_scheme_list() {
        let records = vec![row("P1", "Proc1", "PC1", Some("card"), None, None)];

        let processors = build_hierarchy(&records);

        assert_eq!(processors[0].payment_types.len(), 1);
        assert!(processors[0].payment_types[0].schemes.is_empty());
    }

    #[test]
    fn test_first_row_is_representative_for_processor_attributes() {
        // Same id with drifting attributes: the first row wins, later values
        // are trusted to be identical and never re-checked.
        let records = vec![
            row("P1", "Proc1", "PC1", Some("card"), Some("S1"), Some("A")),
            row("P1", "Proc1-renamed", "PC1-other", Some("card"), Some("S2"), Some("B")),
        ];

        let processors = build_hierarchy(&records);

        assert_eq!(processors[0].processor_name, "Proc1");
        assert_eq!(processors[0].partner_code, "PC1");
    }

    #[test]
    fn test_build_is_deterministic() {
        let records = vec![
            row("P1", "Proc1", "PC1", Some("card"), Some("S1"), Some("A")),
            row("P2", "Proc2", "PC2", Some("wallet"), Some("S2"), Some("B")),
            row("P1", "Proc1", "PC1", Some("card"), Some("S1"), Some("A-dup")),
        ];

        assert_eq!(build_hierarchy(&records), build_hierarchy(&records));
    }
}
