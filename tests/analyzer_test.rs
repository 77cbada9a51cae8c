use email_network::*;

fn raw(from: &str, to: &str) -> Vec<u8> {
    format!("From: {from}\r\nTo: {to}\r\nDate: Wed, 01 Jan 2025 12:00:00 +0000\r\n\r\nbody\r\n")
        .into_bytes()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_single_edge_stats() {
    let graph = CommunicationGraph::from_raw([raw("alice@x.com", "bob@y.com")]);
    let stats = analyze(&graph, 5);

    assert_eq!(stats.nodes, 2);
    assert_eq!(stats.edges, 1);
    assert_eq!(
        stats.top_senders,
        vec![DegreeRank {
            address: "alice@x.com".into(),
            degree: 1
        }]
    );
    assert_eq!(
        stats.top_recipients,
        vec![DegreeRank {
            address: "bob@y.com".into(),
            degree: 1
        }]
    );
    assert!(stats.top_connectors.is_empty());
}

#[test]
fn test_empty_graph_yields_zero_stats() {
    let graph = CommunicationGraph::from_messages(&Vec::<Message>::new());
    let stats = analyze(&graph, 5);

    assert_eq!(stats, NetworkStats::default());
    assert_eq!(
        betweenness_centrality(&graph),
        Err(CentralityError::EmptyGraph)
    );
}

#[test]
fn test_chain_betweenness() {
    let graph = CommunicationGraph::from_raw([
        raw("a@x.com", "b@x.com"),
        raw("b@x.com", "c@x.com"),
        raw("c@x.com", "d@x.com"),
    ]);

    let scores = betweenness_centrality(&graph).unwrap();
    assert!(close(scores["a@x.com"], 0.0));
    assert!(close(scores["b@x.com"], 1.0 / 3.0));
    assert!(close(scores["c@x.com"], 1.0 / 3.0));
    assert!(close(scores["d@x.com"], 0.0));

    let stats = analyze(&graph, 5);
    let connectors: Vec<&str> = stats
        .top_connectors
        .iter()
        .map(|c| c.address.as_str())
        .collect();
    assert_eq!(connectors, vec!["b@x.com", "c@x.com"]);
}

#[test]
fn test_star_hub_is_top_connector() {
    // Everyone talks through the hub
    let graph = CommunicationGraph::from_raw([
        raw("a@x.com", "hub@x.com"),
        raw("b@x.com", "hub@x.com"),
        raw("hub@x.com", "c@x.com, d@x.com"),
    ]);

    let scores = betweenness_centrality(&graph).unwrap();
    // 4 pairs routed through the hub, scaled by 1 / (4 * 3)
    assert!(close(scores["hub@x.com"], 4.0 / 12.0));

    let stats = analyze(&graph, 5);
    assert_eq!(stats.top_connectors.len(), 1);
    assert_eq!(stats.top_connectors[0].address, "hub@x.com");
}

#[test]
fn test_degree_ties_broken_by_address() {
    let graph = CommunicationGraph::from_raw([
        raw("zoe@x.com", "t1@x.com, t2@x.com"),
        raw("amy@x.com", "t1@x.com, t2@x.com"),
        raw("max@x.com", "t1@x.com"),
    ]);

    let stats = analyze(&graph, 5);
    let senders: Vec<(&str, usize)> = stats
        .top_senders
        .iter()
        .map(|r| (r.address.as_str(), r.degree))
        .collect();
    assert_eq!(
        senders,
        vec![("amy@x.com", 2), ("zoe@x.com", 2), ("max@x.com", 1)]
    );

    let recipients: Vec<(&str, usize)> = stats
        .top_recipients
        .iter()
        .map(|r| (r.address.as_str(), r.degree))
        .collect();
    assert_eq!(recipients, vec![("t1@x.com", 3), ("t2@x.com", 2)]);
}

#[test]
fn test_top_n_truncates() {
    let messages: Vec<Vec<u8>> = (0..8)
        .map(|i| raw(&format!("s{i}@x.com"), "inbox@x.com"))
        .collect();
    let graph = CommunicationGraph::from_raw(&messages);

    let stats = analyze(&graph, 5);
    assert_eq!(stats.top_senders.len(), 5);
    assert_eq!(stats.top_senders[0].address, "s0@x.com");

    let stats = analyze(&graph, 3);
    assert_eq!(stats.top_senders.len(), 3);
}

#[test]
fn test_repeated_messages_do_not_change_degrees() {
    let once = CommunicationGraph::from_raw([raw("a@x.com", "b@x.com")]);
    let many = CommunicationGraph::from_raw([
        raw("a@x.com", "b@x.com"),
        raw("a@x.com", "b@x.com"),
        raw("a@x.com", "b@x.com"),
    ]);

    assert_eq!(analyze(&once, 5), analyze(&many, 5));
}

#[test]
fn test_parallel_paths_split_betweenness() {
    // a -> {b, c} -> d
    let graph = CommunicationGraph::from_raw([
        raw("a@x.com", "b@x.com"),
        raw("a@x.com", "c@x.com"),
        raw("b@x.com", "d@x.com"),
        raw("c@x.com", "d@x.com"),
    ]);
    let scores = betweenness_centrality(&graph).unwrap();

    assert!(close(scores["b@x.com"], 0.5 / 6.0));
    assert!(close(scores["c@x.com"], 0.5 / 6.0));
    assert!(close(scores["a@x.com"], 0.0));
    assert!(close(scores["d@x.com"], 0.0));
}

#[test]
fn test_self_addressed_message_adds_no_betweenness() {
    let graph = CommunicationGraph::from_raw([
        raw("a@x.com", "a@x.com"),
        raw("a@x.com", "b@x.com"),
        raw("b@x.com", "c@x.com"),
    ]);
    let scores = betweenness_centrality(&graph).unwrap();

    assert!(close(scores["a@x.com"], 0.0));
    assert!(close(scores["b@x.com"], 0.5));
}
