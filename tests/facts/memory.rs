//! Integration tests for working memory.

use std::sync::Arc;

use millrace_facts::{AttributeSchema, Fact, FactType, WorkingMemory};
use millrace_foundation::{Type, Value};

fn numbered_type(name: &str) -> Arc<FactType> {
    Arc::new(
        FactType::new(name)
            .with_attribute(AttributeSchema::mutable("n", Type::Int))
            .unwrap(),
    )
}

#[test]
fn mixed_batches_group_by_type_in_insertion_order() {
    let reports = numbered_type("Report");
    let diagnoses = numbered_type("Diagnosis");

    let mut memory = WorkingMemory::new();
    for n in 0..4 {
        memory.insert(Fact::builder(&reports).with("n", n).build().unwrap());
        memory.insert(Fact::builder(&diagnoses).with("n", n).build().unwrap());
    }

    let ns = |type_name: &str| -> Vec<i64> {
        memory
            .facts_of_type(type_name)
            .iter()
            .map(|f| f.get("n").unwrap().as_int().unwrap())
            .collect()
    };
    assert_eq!(ns("Report"), [0, 1, 2, 3]);
    assert_eq!(ns("Diagnosis"), [0, 1, 2, 3]);
    assert_eq!(memory.len(), 8);
}

#[test]
fn reinsertion_does_not_reorder() {
    let ty = numbered_type("Report");
    let mut memory = WorkingMemory::new();

    let first = Fact::builder(&ty).with("n", 0).build().unwrap();
    let second = Fact::builder(&ty).with("n", 1).build().unwrap();

    memory.insert(first.clone());
    memory.insert(second);
    memory.insert(first); // already present, keeps its original position

    let ns: Vec<i64> = memory
        .facts_of_type("Report")
        .iter()
        .map(|f| f.get("n").unwrap().as_int().unwrap())
        .collect();
    assert_eq!(ns, [0, 1]);
}

#[test]
fn memory_reads_live_fact_state() {
    let ty = numbered_type("Report");
    let fact = Fact::builder(&ty).with("n", 1).build().unwrap();

    let mut memory = WorkingMemory::new();
    memory.insert(fact.clone());

    fact.set("n", Value::Int(99)).unwrap();
    let held = &memory.facts_of_type("Report")[0];
    assert_eq!(held.get("n").unwrap(), Value::Int(99));
}
