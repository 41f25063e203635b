use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use delivery_car::link_parser;
use delivery_car::{batch_move, scan, CollisionPolicy};
use tempfile::TempDir;

fn populated_inbox(count: usize) -> TempDir {
	let temp_dir = TempDir::new().unwrap();
	for i in 0..count {
		std::fs::write(temp_dir.path().join(format!("image_{i}.png")), b"png").unwrap();
	}
	temp_dir
}

fn bench_scan(c: &mut Criterion) {
	let inbox = populated_inbox(500);

	c.bench_function("inventory_scan_500", |b| {
		b.iter(|| scan(black_box(inbox.path())).unwrap().len())
	});
}

fn bench_batch_move(c: &mut Criterion) {
	c.bench_function("batch_move_100", |b| {
		b.iter_batched(
			|| {
				let inbox = populated_inbox(100);
				let destination = TempDir::new().unwrap();
				(inbox, destination)
			},
			|(inbox, destination)| {
				let files = scan(inbox.path()).unwrap();
				let report =
					batch_move(&files, destination.path(), CollisionPolicy::Overwrite).unwrap();
				black_box(report.moved_count());
			},
			BatchSize::PerIteration,
		)
	});
}

fn bench_link_parser(c: &mut Criterion) {
	let inputs = [
		"illust_123456789_p0.png",
		"httpsx.comjill_07kmstatus1502553581789978626photo1",
		"httpswww.bilibili.comvideoBV13QzTBuE74",
		"holiday_photo.jpg",
	];

	c.bench_function("link_parser_mixed", |b| {
		b.iter(|| {
			for input in inputs {
				black_box(link_parser::parse(black_box(input)));
			}
		})
	});
}

criterion_group!(benches, bench_scan, bench_batch_move, bench_link_parser);
criterion_main!(benches);
