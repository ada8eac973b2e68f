//! Shared-instance behavior under concurrent callers.

use canopy_api::models::{Language, NodeIdentity, Point, Range, RawNode};
use canopy_core::classify::{Classifier, NodeContext};
use canopy_core::identity::IdentityGenerator;
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_generate_agrees_on_digests() {
    let generator = Arc::new(IdentityGenerator::default());
    let identity = NodeIdentity::new("/src/a.ts", "function", Point::new(1, 0), Point::new(4, 1))
        .with_name("f");
    let expected = generator.generate(&identity).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = generator.clone();
            let identity = identity.clone();
            thread::spawn(move || generator.generate(&identity).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    // Idempotent regeneration across threads is not a collision.
    assert_eq!(generator.stats().genuine_collisions, 0);
}

#[test]
fn concurrent_classification_is_value_consistent() {
    let classifier = Arc::new(Classifier::default());
    let expected = classifier.classify(
        &RawNode::new("class_declaration", Language::TYPESCRIPT, Range::of(1, 0, 2, 0)),
        &NodeContext::root(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let classifier = classifier.clone();
            thread::spawn(move || {
                let node = RawNode::new(
                    "class_declaration",
                    Language::TYPESCRIPT,
                    Range::of(1, 0, 2, i),
                );
                classifier.classify(&node, &NodeContext::root())
            })
        })
        .collect();
    for handle in handles {
        // Position is not part of the classification inputs, so every
        // thread must observe the same result, cached or not.
        assert_eq!(handle.join().unwrap(), expected);
    }
    let stats = classifier.stats();
    assert_eq!(stats.total, 9);
}
