use fieldtree::{FieldVertex, KdTree, Point};

fn vertices_from(points: &[(f64, f64, f64)]) -> Vec<FieldVertex<()>> {
    points
        .iter()
        .map(|&(x, y, z)| FieldVertex::new(Point::new(x, y, z), ()))
        .collect()
}

fn dot_string(tree: &KdTree<()>) -> String {
    let mut buffer = Vec::new();
    tree.write_dot(&mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn test_two_point_tree_dot() {
    let tree = KdTree::build(vertices_from(&[(1.0, 0.0, 0.0), (2.0, 0.0, 0.0)])).unwrap();

    // The smaller point is the median, the larger its right leaf.
    assert_eq!(
        dot_string(&tree),
        "digraph G {\n\t\"(1.00, 0.00, 0.00)\" -> \"(2.00, 0.00, 0.00)\"\n}\n"
    );
}

#[test]
fn test_three_point_tree_dot() {
    let tree = KdTree::build(vertices_from(&[
        (3.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (2.0, 0.0, 0.0),
    ]))
    .unwrap();

    assert_eq!(
        dot_string(&tree),
        "digraph G {\n\
         \t\"(2.00, 0.00, 0.00)\" -> \"(1.00, 0.00, 0.00)\"\n\
         \t\"(2.00, 0.00, 0.00)\" -> \"(3.00, 0.00, 0.00)\"\n\
         }\n"
    );
}

#[test]
fn test_dot_covers_every_point() {
    let points = [
        (5.0, 9.0, 10.0),
        (2.0, 6.0, 8.0),
        (14.0, 3.0, 7.0),
        (3.0, 4.0, 9.0),
        (4.0, 13.0, 5.0),
        (8.0, 2.0, 1.0),
        (7.0, 9.0, 6.0),
        (4.0, 1.0, 6.0),
        (2.0, 2.0, 10.0),
    ];
    let tree = KdTree::build(vertices_from(&points)).unwrap();
    let dot = dot_string(&tree);

    assert!(dot.starts_with("digraph G {\n"));
    assert!(dot.ends_with("}\n"));

    // A tree over n points has n - 1 edges.
    let edges = dot.lines().filter(|line| line.contains("->")).count();
    assert_eq!(edges, points.len() - 1);

    for &(x, y, z) in &points {
        let label = format!("\"{}\"", Point::new(x, y, z));
        assert!(dot.contains(&label), "missing {label} in:\n{dot}");
    }
}

#[test]
fn test_same_input_same_tree() {
    let points: Vec<(f64, f64, f64)> = (0..60)
        .map(|i| {
            let i = i as f64;
            (i * 17.0 % 23.0, i * 29.0 % 31.0, i * 41.0 % 37.0)
        })
        .collect();

    let first = KdTree::build(vertices_from(&points)).unwrap();
    let second = KdTree::build(vertices_from(&points)).unwrap();
    assert_eq!(dot_string(&first), dot_string(&second));
}

#[test]
fn test_first_guess_is_not_always_nearest() {
    let tree = KdTree::build(vertices_from(&[(1.0, 0.0, 0.0), (2.0, 0.0, 0.0)])).unwrap();
    let query = Point::new(0.9, 0.0, 0.0);

    // Descending lands on the right leaf even though the root is closer;
    // the full search recovers the true nearest point.
    let guess = tree.nearest_leaf(&query).unwrap();
    assert_eq!(guess.point, Point::new(2.0, 0.0, 0.0));

    let stack = tree.nearest_k(&query, 1).unwrap();
    let &(nearest, _) = stack.front().unwrap();
    assert_eq!(nearest.point, Point::new(1.0, 0.0, 0.0));
}
