use gridpath_core::models::MapCoordinate;
use gridpath_core::planner::cluster::ClusterMap;
use gridpath_core::planner::edge::{AbstractEdge, EdgeMap, EdgeType};
use gridpath_core::planner::node::{AbstractNode, NodeMap};

fn mc(x: i32, y: i32) -> MapCoordinate {
    MapCoordinate::new(x, y)
}

fn node(x: i32, y: i32) -> AbstractNode {
    AbstractNode::new(1, mc(0, 0), mc(x, y))
}

fn intra(src: MapCoordinate, dst: MapCoordinate, weight: f64) -> AbstractEdge {
    AbstractEdge { level: 1, source: src, destination: dst, edge_type: EdgeType::Intra, weight }
}

#[test]
fn node_add_overwrites_on_the_same_tile() {
    let mut nm = NodeMap::new();
    nm.add(node(0, 0));
    nm.add(AbstractNode::new_ephemeral(1, mc(0, 0), mc(0, 0)));
    assert_eq!(nm.len(), 1);
    assert!(nm.get(mc(0, 0)).unwrap().is_ephemeral());
}

#[test]
fn node_remove_clears_the_key() {
    let mut nm = NodeMap::new();
    nm.add(node(1, 2));
    assert!(nm.remove(mc(1, 2)).is_some());
    assert!(nm.get(mc(1, 2)).is_none());
    assert!(nm.remove(mc(1, 2)).is_none());
}

#[test]
fn nodes_resolve_by_cluster_rectangle() {
    // 4x4 map, 2x2 clusters; nodes in cluster (0, 0) and (1, 1).
    let cm = ClusterMap::build(mc(4, 4), mc(2, 2), 1).unwrap();
    let mut nm = NodeMap::new();
    nm.add(node(0, 0));
    nm.add(node(1, 1));
    nm.add(node(3, 3));

    let c00 = cm.get(mc(0, 0)).unwrap();
    let mut tiles: Vec<MapCoordinate> = nm
        .get_by_cluster(c00)
        .iter()
        .map(|n| n.tile_coordinate())
        .collect();
    tiles.sort();
    assert_eq!(tiles, vec![mc(0, 0), mc(1, 1)]);

    let c11 = cm.get(mc(1, 1)).unwrap();
    let tiles: Vec<MapCoordinate> = nm
        .get_by_cluster(c11)
        .iter()
        .map(|n| n.tile_coordinate())
        .collect();
    assert_eq!(tiles, vec![mc(3, 3)]);
}

#[test]
fn cluster_edge_lookup_skips_interior_nodes() {
    // One 3x3 cluster: (1, 1) is interior, everything else is perimeter.
    let cm = ClusterMap::build(mc(3, 3), mc(3, 3), 1).unwrap();
    let mut nm = NodeMap::new();
    nm.add(node(0, 0));
    nm.add(node(1, 1));
    nm.add(node(2, 1));

    let c = cm.get(mc(0, 0)).unwrap();
    let mut tiles: Vec<MapCoordinate> = nm
        .get_by_cluster_edge(c)
        .iter()
        .map(|n| n.tile_coordinate())
        .collect();
    tiles.sort();
    assert_eq!(tiles, vec![mc(0, 0), mc(2, 1)]);
}

#[test]
fn edge_get_is_commutative() {
    let mut em = EdgeMap::new();
    em.add(intra(mc(0, 0), mc(0, 1), 2.0)).unwrap();

    let forward = em.get(mc(0, 0), mc(0, 1)).unwrap();
    let backward = em.get(mc(0, 1), mc(0, 0)).unwrap();

    assert_eq!(forward.source, mc(0, 0));
    assert_eq!(forward.destination, mc(0, 1));
    assert_eq!(backward.source, mc(0, 1));
    assert_eq!(backward.destination, mc(0, 0));
    assert_eq!(forward.weight, backward.weight);
    assert!(forward.equivalent(&backward));
}

#[test]
fn edge_add_conflicts_on_either_direction() {
    let mut em = EdgeMap::new();
    em.add(intra(mc(0, 0), mc(0, 1), 2.0)).unwrap();
    assert!(em.add(intra(mc(0, 0), mc(0, 1), 2.0)).is_err());
    assert!(em.add(intra(mc(0, 1), mc(0, 0), 5.0)).is_err());
    assert_eq!(em.len(), 1);
}

#[test]
fn edge_remove_drops_both_directions() {
    let mut em = EdgeMap::new();
    em.add(intra(mc(0, 0), mc(0, 1), 2.0)).unwrap();
    assert!(em.remove(mc(0, 1), mc(0, 0)).is_some());
    assert!(em.get(mc(0, 0), mc(0, 1)).is_none());
    assert!(em.get(mc(0, 1), mc(0, 0)).is_none());
    assert!(em.is_empty());
}

#[test]
fn edges_resolve_by_source_with_swapped_orientation() {
    let mut em = EdgeMap::new();
    em.add(intra(mc(1, 1), mc(0, 0), 3.0)).unwrap();
    em.add(intra(mc(1, 1), mc(2, 2), 4.0)).unwrap();
    em.add(intra(mc(0, 0), mc(2, 2), 9.0)).unwrap();

    let mut from_center = em.get_by_source(mc(1, 1));
    from_center.sort_by_key(|e| e.destination);
    assert_eq!(from_center.len(), 2);
    for e in &from_center {
        assert_eq!(e.source, mc(1, 1));
    }
    assert_eq!(from_center[0].destination, mc(0, 0));
    assert_eq!(from_center[1].destination, mc(2, 2));
}

#[test]
fn remove_incident_detaches_a_node() {
    let mut em = EdgeMap::new();
    em.add(intra(mc(1, 1), mc(0, 0), 3.0)).unwrap();
    em.add(intra(mc(1, 1), mc(2, 2), 4.0)).unwrap();
    em.add(intra(mc(0, 0), mc(2, 2), 9.0)).unwrap();

    assert_eq!(em.remove_incident(mc(1, 1)), 2);
    assert_eq!(em.len(), 1);
    assert!(em.get(mc(0, 0), mc(2, 2)).is_some());
}
