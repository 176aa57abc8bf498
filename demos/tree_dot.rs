use std::fs::File;

use fieldtree::{FieldVertex, KdTree, Point};
use rand::Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Ten random samples; the payload plays no part in the tree shape.
    let mut rng = rand::thread_rng();
    let vertices: Vec<FieldVertex<()>> = (0..10)
        .map(|_| {
            FieldVertex::new(
                Point::new(
                    rng.gen_range(0.0..20.0),
                    rng.gen_range(0.0..20.0),
                    rng.gen_range(0.0..20.0),
                ),
                (),
            )
        })
        .collect();

    let tree = KdTree::build(vertices)?;

    let filename = "mytree.dot";
    let mut file = File::create(filename)?;
    tree.write_dot(&mut file)?;

    println!("Tree written to {}", filename);
    println!("Render it with: dot -Tpng {} -o mytree.png", filename);
    Ok(())
}
