use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagekit_blocks::{tree, BlockList, BlockRegistry, BlockType, InsertMode};

/// `width` root-level groups, each holding `width` text blocks
fn wide_document(width: usize) -> (BlockList, String) {
    let mut registry = BlockRegistry::sequential("bench");
    let mut doc = BlockList::new();
    let mut last_id = String::new();

    for _ in 0..width {
        let group = registry.create(BlockType::Group);
        let group_id = group.id.clone();
        doc = tree::append(&doc, group);

        for _ in 0..width {
            let text = registry.create(BlockType::Text);
            last_id = text.id.clone();
            doc = tree::insert(&doc, &group_id, text, InsertMode::inside());
        }
    }

    (doc, last_id)
}

fn insert_deep_target(c: &mut Criterion) {
    let (doc, target) = wide_document(50);
    let mut registry = BlockRegistry::sequential("new");

    c.bench_function("insert_adjacent_last_node", |b| {
        b.iter(|| {
            let block = registry.create(BlockType::Text);
            tree::insert(
                black_box(&doc),
                black_box(&target),
                block,
                InsertMode::Adjacent,
            )
        })
    });
}

fn remove_deep_target(c: &mut Criterion) {
    let (doc, target) = wide_document(50);

    c.bench_function("remove_last_node", |b| {
        b.iter(|| tree::remove(black_box(&doc), black_box(&target)))
    });
}

fn find_missing(c: &mut Criterion) {
    let (doc, _) = wide_document(50);

    c.bench_function("find_missing_id", |b| {
        b.iter(|| tree::find(black_box(&doc), black_box("missing")))
    });
}

fn parse_document(c: &mut Criterion) {
    let (doc, _) = wide_document(30);
    let json = serde_json::to_string(&doc).unwrap();

    c.bench_function("parse_document_json", |b| {
        b.iter(|| serde_json::from_str::<BlockList>(black_box(&json)).unwrap())
    });
}

criterion_group!(
    benches,
    insert_deep_target,
    remove_deep_target,
    find_missing,
    parse_document
);
criterion_main!(benches);
