use waystage_core::{
    Condition, Datasources, EdgeBasedNodeId, EdgeId, Modifier, MonthDay, NodeId, NodeMapping,
    SegmentColumns, SegmentData, SegmentEntry, TimeSpan, TurnRestriction, Weekday,
};
use waystage_format::{
    read_datasources, read_node_mappings, read_segment_data, read_turn_restrictions,
    write_datasources, write_node_mappings, write_segment_data, write_turn_restrictions,
    FINGERPRINT_SIZE,
};

fn segments(n: u32) -> SegmentData {
    let mut data = SegmentData::new((0..n / 2).collect());
    for i in 0..n {
        data.push(SegmentEntry {
            node: NodeId(i * 3),
            fwd_weight: i + 1,
            rev_weight: i + 2,
            fwd_duration: i * 7,
            rev_duration: i * 9,
            datasource: (i % 4) as u8,
        });
    }
    data
}

#[test_log::test]
fn node_mappings_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.nbg_to_ebg");
    let mappings: Vec<NodeMapping> = (0..500)
        .map(|i| NodeMapping::new(NodeId(i), EdgeBasedNodeId(1000 - i)))
        .collect();
    write_node_mappings(&path, &mappings).unwrap();
    assert_eq!(read_node_mappings(&path).unwrap(), mappings);
}

#[test_log::test]
fn segment_data_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.geometry");
    let data = segments(64);
    write_segment_data(&path, &data).unwrap();
    assert_eq!(read_segment_data(&path).unwrap(), data);
}

#[test_log::test]
fn datasources_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.datasource_names");
    let mut sources = Datasources::default();
    sources.set_name(2, "speeds-2024.csv").unwrap();
    write_datasources(&path, &sources).unwrap();
    assert_eq!(read_datasources(&path).unwrap(), sources);
}

#[test_log::test]
fn empty_collections_roundtrip() {
    let dir = tempfile::tempdir().unwrap();

    let mappings = dir.path().join("empty.nbg_to_ebg");
    write_node_mappings(&mappings, &[]).unwrap();
    assert!(read_node_mappings(&mappings).unwrap().is_empty());

    let geometry = dir.path().join("empty.geometry");
    write_segment_data(&geometry, &SegmentData::default()).unwrap();
    let loaded = read_segment_data(&geometry).unwrap();
    assert!(loaded.is_empty());
    assert!(loaded.index().is_empty());

    // Index entries without any segments are still carried.
    let index_only = dir.path().join("index_only.geometry");
    let data = SegmentData::new(vec![4, 5, 6]);
    write_segment_data(&index_only, &data).unwrap();
    assert_eq!(read_segment_data(&index_only).unwrap(), data);

    let restrictions = dir.path().join("empty.restrictions");
    write_turn_restrictions(&restrictions, &[]).unwrap();
    assert!(read_turn_restrictions(&restrictions).unwrap().is_empty());

    let unconditional = dir.path().join("unconditional.restrictions");
    let r = vec![TurnRestriction::new(NodeId(1), EdgeId(2), EdgeId(3), false)];
    write_turn_restrictions(&unconditional, &r).unwrap();
    let loaded = read_turn_restrictions(&unconditional).unwrap();
    assert_eq!(loaded, r);
    assert!(loaded[0].is_unconditional());
}

#[test_log::test]
fn mismatched_columns_never_reach_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.geometry");
    let columns = SegmentColumns {
        index: vec![0],
        nodes: vec![NodeId(1), NodeId(2), NodeId(3)],
        fwd_weights: vec![1, 2, 3],
        rev_weights: vec![1, 2, 3],
        fwd_durations: vec![1, 2, 3],
        rev_durations: vec![1, 2, 3],
        datasources: vec![0, 0],
    };

    let result = SegmentData::from_columns(columns)
        .map_err(waystage_core::error::Error::from)
        .and_then(|data| write_segment_data(&path, &data));

    let err = result.unwrap_err();
    assert!(err.is_invariant_violation());
    assert!(err.to_string().contains("datasources has 2 entries, expected 3"));
    assert!(!path.exists());
}

#[test_log::test]
fn conditions_decode_with_independent_lengths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested.restrictions");

    let a = Condition {
        modifier: Modifier::Off,
        times: vec![TimeSpan::new(0, 60), TimeSpan::new(120, 180), TimeSpan::new(600, 660)],
        weekdays: vec![],
        monthdays: vec![MonthDay::new(1, 1)],
    };
    let b = Condition {
        modifier: Modifier::Open,
        times: vec![],
        weekdays: (0..7).map(Weekday).collect(),
        monthdays: vec![],
    };
    let restrictions = vec![
        TurnRestriction::new(NodeId(5), EdgeId(6), EdgeId(7), false)
            .with_condition(a.clone())
            .with_condition(b.clone()),
        TurnRestriction::new(NodeId(8), EdgeId(9), EdgeId(10), true).with_condition(b.clone()),
        TurnRestriction::new(NodeId(11), EdgeId(12), EdgeId(13), true),
    ];

    write_turn_restrictions(&path, &restrictions).unwrap();
    let loaded = read_turn_restrictions(&path).unwrap();

    assert_eq!(loaded, restrictions);
    assert_eq!(loaded[0].conditions[0].times.len(), 3);
    assert_eq!(loaded[0].conditions[0].weekdays.len(), 0);
    assert_eq!(loaded[0].conditions[1].times.len(), 0);
    assert_eq!(loaded[0].conditions[1].weekdays.len(), 7);
    assert_eq!(loaded[1].conditions, vec![b]);
    assert!(loaded[2].conditions.is_empty());
}

#[test_log::test]
fn closed_weekday_mornings_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.restrictions");

    let restriction =
        TurnRestriction::new(NodeId(10), EdgeId(20), EdgeId(30), true).with_condition(Condition {
            modifier: Modifier::Closed,
            times: vec![TimeSpan::new(6, 9)],
            weekdays: vec![Weekday(1), Weekday(3), Weekday(5)],
            monthdays: vec![],
        });
    assert_eq!(restriction.conditions[0].modifier.as_u8(), 2);

    write_turn_restrictions(&path, std::slice::from_ref(&restriction)).unwrap();
    assert_eq!(read_turn_restrictions(&path).unwrap(), vec![restriction]);

    let bytes = std::fs::read(&path).unwrap();
    let count = &bytes[FINGERPRINT_SIZE..FINGERPRINT_SIZE + 8];
    assert_eq!(count, &1u64.to_ne_bytes());
    assert_eq!(waystage_format::peek_restriction_count(&path).unwrap(), 1);
}

#[test_log::test]
fn trailing_bytes_are_ignored() {
    let dir = tempfile::tempdir().unwrap();

    let restrictions = dir.path().join("trailing.restrictions");
    let r = vec![TurnRestriction::new(NodeId(1), EdgeId(2), EdgeId(3), true)];
    write_turn_restrictions(&restrictions, &r).unwrap();
    let mut bytes = std::fs::read(&restrictions).unwrap();
    bytes.extend_from_slice(b"garbage");
    std::fs::write(&restrictions, bytes).unwrap();
    assert_eq!(read_turn_restrictions(&restrictions).unwrap(), r);

    let geometry = dir.path().join("trailing.geometry");
    let data = segments(5);
    write_segment_data(&geometry, &data).unwrap();
    let mut bytes = std::fs::read(&geometry).unwrap();
    bytes.extend_from_slice(&[0xff; 3]);
    std::fs::write(&geometry, bytes).unwrap();
    assert_eq!(read_segment_data(&geometry).unwrap(), data);
}
