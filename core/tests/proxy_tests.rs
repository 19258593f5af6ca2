// tests/proxy_tests.rs
mod common;

use common::*;
use anvil::{AnvilError, Container, ContainerProxy, DefaultHooks, KeyCodec, Namespaces, SeparatorCodec};

const CODEC: SeparatorCodec = SeparatorCodec::new(':');

type TallySpaces = Namespaces<String, String, Tally, DefaultHooks>;

/// Backing structure with two outer entries, each carrying a "data" and an
/// "assets" namespace.
fn sample_spaces() -> TallySpaces {
  let mut spaces = TallySpaces::default();
  for outer in ["alpha", "beta"] {
    let mut namespaces = indexmap::IndexMap::new();
    let mut data = Container::new();
    data.insert(format!("{outer}/one"), Tally::new(1, "seed"));
    data.insert(format!("{outer}/two"), Tally::new(2, "seed"));
    namespaces.insert("data".to_string(), data);
    let mut assets = Container::new();
    assets.insert("texture".to_string(), Tally::new(9, "seed"));
    namespaces.insert("assets".to_string(), assets);
    spaces.insert(outer.to_string(), namespaces);
  }
  spaces
}

#[test]
fn test_split_join_round_trip() {
  setup_tracing();
  for key in ["alpha:one", "beta:path/to/item", "ns:inner:with:colons"] {
    let key = key.to_string();
    let (outer, inner) = CODEC.split_key(&key).unwrap();
    assert_eq!(CODEC.join_key(&outer, &inner), key);
  }
  assert!(CODEC.split_key(&"no-separator".to_string()).is_none());
}

#[test]
fn test_get_and_insert_through_flat_keys() {
  setup_tracing();
  let mut spaces = sample_spaces();
  let mut proxy = ContainerProxy::new(&mut spaces, "data".to_string(), CODEC);

  assert_eq!(proxy.get(&"alpha:alpha/one".to_string()).unwrap().total, 1);
  assert!(proxy.get(&"alpha:absent".to_string()).is_none());

  proxy
    .insert("beta:beta/three".to_string(), Tally::new(3, "new"))
    .unwrap();
  assert_eq!(proxy.get(&"beta:beta/three".to_string()).unwrap().total, 3);
}

#[test]
fn test_insert_creates_missing_namespace() {
  setup_tracing();
  let mut spaces = TallySpaces::default();
  let mut proxy = ContainerProxy::new(&mut spaces, "data".to_string(), CODEC);

  proxy
    .insert("gamma:fresh".to_string(), Tally::new(4, "new"))
    .unwrap();
  assert_eq!(proxy.len(), 1);
  assert_eq!(proxy.get(&"gamma:fresh".to_string()).unwrap().total, 4);
}

#[test]
fn test_insert_rejects_non_composite_key() {
  setup_tracing();
  let mut spaces = TallySpaces::default();
  let mut proxy = ContainerProxy::new(&mut spaces, "data".to_string(), CODEC);

  let err = proxy.insert("flat".to_string(), Tally::new(1, "new")).unwrap_err();
  assert!(matches!(err, AnvilError::KeyNotFound { key } if key == "flat"));
}

#[test]
fn test_remove_targets_only_inner_entry() {
  setup_tracing();
  let mut spaces = sample_spaces();
  let mut proxy = ContainerProxy::new(&mut spaces, "data".to_string(), CODEC);
  assert_eq!(proxy.len(), 4);

  let removed = proxy.remove(&"alpha:alpha/one".to_string()).unwrap();
  assert_eq!(removed.total, 1);
  assert_eq!(proxy.len(), 3);

  // Sibling outer entries keep their sizes; other namespaces are untouched.
  assert_eq!(spaces["beta"]["data"].len(), 2);
  assert_eq!(spaces["alpha"]["assets"].len(), 1);
}

#[test]
fn test_len_counts_only_selected_namespace() {
  setup_tracing();
  let mut spaces = sample_spaces();
  let data = ContainerProxy::new(&mut spaces, "data".to_string(), CODEC);
  assert_eq!(data.len(), 4);
  drop(data);
  let assets = ContainerProxy::new(&mut spaces, "assets".to_string(), CODEC);
  assert_eq!(assets.len(), 2);
}

#[test]
fn test_keys_recomposed_in_order() {
  setup_tracing();
  let mut spaces = sample_spaces();
  let proxy = ContainerProxy::new(&mut spaces, "data".to_string(), CODEC);

  let keys: Vec<String> = proxy.keys().collect();
  assert_eq!(
    keys,
    [
      "alpha:alpha/one",
      "alpha:alpha/two",
      "beta:beta/one",
      "beta:beta/two",
    ]
  );
}

#[test]
fn test_merge_over_flattened_view() {
  setup_tracing();
  let mut spaces = sample_spaces();
  let mut proxy = ContainerProxy::new(&mut spaces, "data".to_string(), CODEC);

  proxy
    .merge(vec![
      // Existing entry: delegated merge mutates in place.
      ("alpha:alpha/one".to_string(), Tally::new(10, "incoming")),
      // Absent entry (new outer): inserted.
      ("gamma:fresh".to_string(), Tally::new(5, "incoming")),
    ])
    .unwrap();

  assert_eq!(proxy.get(&"alpha:alpha/one".to_string()).unwrap().total, 11);
  assert_eq!(proxy.get(&"alpha:alpha/one".to_string()).unwrap().tag, "seed");
  assert_eq!(proxy.get(&"gamma:fresh".to_string()).unwrap().total, 5);
  assert_eq!(proxy.len(), 5);
}

#[test]
fn test_matching_over_flat_keys() {
  setup_tracing();
  let mut spaces = sample_spaces();
  let proxy = ContainerProxy::new(&mut spaces, "data".to_string(), CODEC);

  let all = proxy.matching(&[]).unwrap();
  assert_eq!(all.len(), 4);

  let alpha_only = proxy.matching(&["alpha:*"]).unwrap();
  assert_eq!(alpha_only.len(), 2);
  assert!(alpha_only.contains("alpha:alpha/one"));
}
