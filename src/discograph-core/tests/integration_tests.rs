//! Integration tests for discograph-core
//!
//! These tests exercise complete workflows across the graph core, the query
//! layer, selection, merging and export without duplicating the unit tests
//! of the individual modules.

use common_config::{GraphConfig, MergeConfig};
use common_error::DiscographError;
use discograph_core::export::FlatGraph;
use discograph_core::query::{add_offsets, get_span_offsets, spanstring_to_tokens, token_offsets};
use discograph_core::testing::{GraphAssertions, GraphFixture};
use discograph_core::*;
use proptest::prelude::*;

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

/// root → S → {I, saw, a, cat, .}
fn flat_sentence() -> AnnotationGraph {
    let mut graph = AnnotationGraph::new("ns");
    for (i, token) in ["I", "saw", "a", "cat", "."].iter().enumerate() {
        let data = NodeData::new(["ns", "ns:token"]).with_attribute("ns:token", *token);
        graph.add_node_data(format!("tok{i}"), data).unwrap();
        graph.tokens.push(NodeId::from(format!("tok{i}")));
    }
    graph.add_node("S", ["ns", "ns:syntax"], AttributeMap::new()).unwrap();
    let root = graph.root().clone();
    graph.add_edge(root, "S", ["ns"], Some(EdgeType::Dominance)).unwrap();
    for i in 0..5 {
        graph
            .add_edge("S", format!("tok{i}"), ["ns"], Some(EdgeType::Dominance))
            .unwrap();
    }
    graph
}

#[test]
fn test_span_and_text_of_flat_sentence() {
    let graph = flat_sentence();
    let span = get_span(&graph, &id("S"), false).unwrap();
    assert_eq!(
        span,
        vec![id("tok0"), id("tok1"), id("tok2"), id("tok3"), id("tok4")]
    );
    assert_eq!(get_text(&graph, Some(&id("S"))).unwrap(), "I saw a cat .");
}

#[test]
fn test_layer_union_on_repeated_add_node() {
    let mut graph = AnnotationGraph::new("ns");
    graph.add_node("n1", ["x"], AttributeMap::new()).unwrap();
    graph.add_node("n1", ["y"], AttributeMap::new()).unwrap();
    let layers: Vec<&str> = graph
        .node(&id("n1"))
        .unwrap()
        .layers
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(layers, vec!["x", "y"]);
}

#[test]
fn test_strict_edges_from_config() {
    let config = GraphConfig {
        strict_edges: true,
        ..GraphConfig::with_namespace("strict")
    };
    let mut graph = AnnotationGraph::from_config(&config);
    let root = graph.root().clone();
    let err = graph
        .add_edge(root.clone(), "missing", ["strict"], Some(EdgeType::Dominance))
        .unwrap_err();
    assert!(matches!(err, DiscographError::NodeNotFound(_)));
    assert_eq!(graph.node_count(), 1);

    graph.set_strict_edges(false);
    graph
        .add_edge(root, "missing", ["strict"], Some(EdgeType::Dominance))
        .unwrap();
    let _ = GraphAssertions::new(&graph)
        .assert_node_count(2)
        .assert_node_in_layer(&id("missing"), "strict");
}

#[test]
fn test_merge_of_two_layers_over_one_sentence() {
    let text = "I saw a cat .";
    let mut syntax = AnnotationGraph::build(&TokenizedTextBuilder::new("tiger", text)).unwrap();
    let mut coref = AnnotationGraph::build(&TokenizedTextBuilder::new("mmax", text)).unwrap();
    coref.add_node("mmax:markable_1", ["mmax", "mmax:markable"], AttributeMap::new()).unwrap();
    coref
        .add_edge("mmax:markable_1", "mmax:token_3", ["mmax", "mmax:markable"], Some(EdgeType::Spanning))
        .unwrap();
    coref.set_metadata("annotator", "a1").unwrap();

    syntax.merge_graphs(coref, &MergeConfig::default()).unwrap();

    assert_eq!(syntax.tokens.len(), 5);
    assert_eq!(
        select_nodes_by_layer(&syntax, "mmax:token").count(),
        5,
        "token nodes are shared, not duplicated"
    );
    for token in &syntax.tokens {
        let layers = &syntax.node(token).unwrap().layers;
        assert!(layers.contains("tiger:token") && layers.contains("mmax:token"));
    }
    assert!(!syntax.has_node(&id("mmax:root_node")));
    assert_eq!(syntax.merged_rootnodes(), &[id("mmax:root_node")]);
    assert_eq!(
        syntax.metadata().and_then(|m| m.get("annotator")),
        Some(&Value::from("a1"))
    );

    assert_eq!(get_text(&syntax, Some(&id("mmax:markable_1"))).unwrap(), "cat");
    let top: Vec<String> = get_top_level_layers(&syntax).into_iter().collect();
    assert_eq!(top, vec!["mmax", "tiger"]);
    assert_eq!(
        spanstring_to_tokens(&syntax, "mmax:token_3").unwrap(),
        vec![id("tiger:token_3")]
    );
    assert_eq!(syntax.format(), &GraphFormat::Tokenized);
}

#[test]
fn test_merge_reports_tokenization_mismatch() {
    let mut a = AnnotationGraph::build(
        &TokenizedTextBuilder::new("a", "Ich bin kein Berliner .").with_name("left"),
    )
    .unwrap();
    let b = AnnotationGraph::build(
        &TokenizedTextBuilder::new("b", "Ich bin ein Berliner .").with_name("right"),
    )
    .unwrap();

    let err = a.merge_graphs(b, &MergeConfig::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Tokenization mismatch at token 2"));
    assert!(message.contains("left (a) vs. right (b)"));
    assert!(message.contains("kein != ein"));
    assert!(message.contains("Ich bin [[ein]] Berliner ."));
    assert_eq!(a.node_count(), 1 + 5 + 1);
}

#[test]
fn test_offsets_over_document() {
    let mut graph =
        AnnotationGraph::build(&TokenizedTextBuilder::new("plain", "Ich bin ein Berliner .")).unwrap();
    add_offsets(&mut graph, None).unwrap();
    let offsets: Vec<(usize, usize)> = token_offsets(&mut graph, None)
        .unwrap()
        .map(|item| item.map(|(_, onset, offset)| (onset, offset)))
        .collect::<Result<_, DiscographError>>()
        .unwrap();
    assert_eq!(offsets, vec![(0, 3), (4, 7), (8, 11), (12, 20), (21, 22)]);
    assert_eq!(
        get_span_offsets(&mut graph, &id("plain:sentence_0")).unwrap(),
        (0, 22)
    );
}

#[test]
fn test_pointing_chains_and_selection() {
    let mut fixture = GraphFixture::tokens("coref", &["Peter", "said", "he", "was", "tired"]);
    for markable in ["m1", "m2", "m3"] {
        fixture.add_node(markable, ["coref", "coref:markable"]);
    }
    fixture.points_to("m3", "m2");
    fixture.points_to("m2", "m1");
    let graph = fixture.into_graph();

    let chains = get_pointing_chains(&graph, "coref").unwrap();
    assert_eq!(chains, vec![vec![id("m3"), id("m2"), id("m1")]]);

    let markables: Vec<&NodeId> = select_nodes_by_layer(&graph, "coref:markable")
        .map(|node| node.id)
        .collect();
    assert_eq!(markables, vec![&id("m1"), &id("m2"), &id("m3")]);
    assert_eq!(
        select_edges_by(&graph, LayerFilter::All, Some(EdgeType::Pointing)).count(),
        2
    );
}

#[test]
fn test_snapshot_and_export_of_merged_graph() {
    let mut a = GraphFixture::sentence("a", &["x", "y"]).into_graph();
    let mut b = GraphFixture::sentence("b", &["x", "y"]).into_graph();
    b.set_metadata("source", "b.xml").unwrap();
    a.set_metadata("source", "a.xml").unwrap();
    a.merge_graphs(b, &MergeConfig::default()).unwrap();

    let restored = AnnotationGraph::from_json(&a.to_json_pretty().unwrap()).unwrap();
    assert_eq!(restored.node_count(), a.node_count());
    assert_eq!(restored.edge_count(), a.edge_count());
    assert_eq!(restored.renamed_nodes(), a.renamed_nodes());
    assert_eq!(restored.merged_rootnodes(), a.merged_rootnodes());

    let flat = FlatGraph::new(&restored)
        .layers_as_string()
        .attribute_lists_as_strings()
        .remove_root_metadata();
    assert!(flat.is_scalar());
    assert!(!flat
        .node(restored.root())
        .unwrap()
        .attributes
        .contains_key("metadata"));
}

#[test]
fn test_edge_records_with_explicit_keys() {
    let mut graph = AnnotationGraph::new("rst");
    let mut attributes = AttributeMap::new();
    attributes.insert("rst:segment_type".to_string(), Value::from("nucleus"));
    graph
        .add_node_data("seg1", NodeData::new(["rst", "rst:segment"]).with_attributes(attributes))
        .unwrap();
    let relation = EdgeData::new(["rst", "rst:relation"])
        .with_edge_type(EdgeType::Dominance)
        .with_attribute("rst:relname", "elaboration");

    let keys = graph
        .add_edges_from([
            EdgeRecord::new("seg1", "seg2", relation.clone()).with_key(7),
            EdgeRecord::new("seg1", "seg2", relation.clone()),
            EdgeRecord::new("seg1", "seg2", relation).with_key(7),
        ])
        .unwrap();
    // the first free key for a second parallel edge is 1; key 7 is reused
    assert_eq!(keys, vec![7, 1, 7]);
    assert_eq!(graph.edges_between(&id("seg1"), &id("seg2")).count(), 2);

    let by_relname: Vec<_> = select_edges_by_attribute(&graph, Some("rst:relname"), "elaboration").collect();
    assert_eq!(by_relname.len(), 2);
    assert_eq!(
        select_nodes_by_attribute(&graph, Some("rst:segment_type"), "nucleus").count(),
        1
    );
}

#[test]
fn test_spanstring_conversion() {
    assert_eq!(
        convert_spanstring("word_7..word_9,word_15").unwrap(),
        vec!["word_7", "word_8", "word_9", "word_15"]
    );
    assert!(convert_spanstring("word_9..word_7").is_err());
}

proptest! {
    #[test]
    fn test_builder_contract_holds(sentences in prop::collection::vec(prop::collection::vec("[a-z]{1,5}", 1..6), 1..4)) {
        let text: Vec<String> = sentences.iter().map(|tokens| tokens.join(" ")).collect();
        let graph = AnnotationGraph::build(&TokenizedTextBuilder::new("p", text.join("\n"))).unwrap();

        let expected: Vec<&str> = sentences.iter().flatten().map(String::as_str).collect();
        prop_assert_eq!(graph.token_strings().unwrap(), expected);
        prop_assert_eq!(graph.sentences.len(), sentences.len());
        prop_assert!(check_construction_contract(&graph).is_ok());

        for (sentence, tokens) in graph.sentences.iter().zip(&sentences) {
            prop_assert_eq!(get_text(&graph, Some(sentence)).unwrap(), tokens.join(" "));
        }
    }
}
