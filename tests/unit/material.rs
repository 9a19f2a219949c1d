use super::*;

#[test]
fn builtin_table_order_and_lookup() {
    let table = MaterialTable::builtin();
    table.validate().unwrap();
    assert_eq!(
        table.names(),
        vec!["platinum", "white-gold", "yellow-gold", "rose-gold"]
    );
    assert_eq!(table.len(), 4);

    let rose = table.get("rose-gold").unwrap();
    assert_eq!(rose.metalness, 1.0);
    assert!(table.get("unknown-material").is_none());
    assert!(table.get("Rose-Gold").is_none());
}

#[test]
fn out_of_range_factors_are_rejected() {
    assert!(
        MaterialPreset::new("bad", 1.5, 0.1, [0.5, 0.5, 0.5])
            .validate()
            .is_err()
    );
    assert!(
        MaterialPreset::new("bad", 1.0, -0.1, [0.5, 0.5, 0.5])
            .validate()
            .is_err()
    );
    assert!(
        MaterialPreset::new("bad", 1.0, 0.1, [0.5, f32::NAN, 0.5])
            .validate()
            .is_err()
    );
    assert!(
        MaterialPreset::new("a/b", 1.0, 0.1, [0.5, 0.5, 0.5])
            .validate()
            .is_err()
    );
}

#[test]
fn duplicate_and_empty_tables_are_rejected() {
    let p = MaterialPreset::new("silver", 1.0, 0.2, [0.9, 0.9, 0.9]);
    assert!(MaterialTable::new(vec![p.clone(), p.clone()]).is_err());
    assert!(MaterialTable::new(vec![]).is_err());
    let t = MaterialTable::new(vec![p]).unwrap();
    assert_eq!(t.iter().count(), 1);
}
