use criterion::{Criterion, black_box, criterion_group, criterion_main};
use shiftdesk_core::{RosterRange, classify_shift, match_assignment};

fn bench_roster(c: &mut Criterion) {
    let roster: Vec<RosterRange> = RosterRange::ALL.iter().copied().cycle().take(40).collect();

    c.bench_function("match_assignment_40_entries", |b| {
        b.iter(|| {
            for hour in 0..24 {
                black_box(match_assignment(black_box(&roster), hour));
            }
        })
    });

    c.bench_function("classify_shift_day", |b| {
        b.iter(|| {
            for hour in 0..24 {
                black_box(classify_shift(black_box(hour)));
            }
        })
    });
}

criterion_group!(benches, bench_roster);
criterion_main!(benches);
