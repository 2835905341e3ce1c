use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ghinvite_core::types::InvitationStatus;
use ghinvite_core::username::{extract_username, Heuristic};

fn generate_chat_messages(count: usize) -> Vec<String> {
    let templates = [
        "Please add this person to our GitHub: user{}",
        "We need to add @user{} on GitHub",
        "Profile: https://github.com/user{}",
        "hey team, can someone invite user{} please",
        "!!! ??? ... {}",
    ];

    (0..count)
        .map(|i| templates[i % templates.len()].replace("{}", &i.to_string()))
        .collect()
}

fn bench_single_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_message");

    let messages = vec![
        ("labeled", "Please add this person to our GitHub: testuser1"),
        ("suffix", "We need to add @testuser3 on GitHub"),
        ("profile_url", "Profile: github.com/testuser4"),
        ("fallback", "!!! ... @octocat"),
        ("no_match", "!!! ??? ... 🎉"),
    ];

    for (name, text) in messages {
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, &text| {
            b.iter(|| extract_username(black_box(text)));
        });
    }

    group.finish();
}

fn bench_heuristics_in_isolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristic");
    let text = "a fairly long message without any of the labeled forms, ending in octocat";

    for heuristic in Heuristic::ORDER {
        group.bench_with_input(
            BenchmarkId::from_parameter(heuristic.as_str()),
            &heuristic,
            |b, heuristic| {
                b.iter(|| heuristic.capture(black_box(text)));
            },
        );
    }

    group.finish();
}

fn bench_message_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_batches");

    for count in [100, 1_000, 10_000] {
        let messages = generate_chat_messages(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &messages, |b, messages| {
            b.iter(|| {
                messages
                    .iter()
                    .filter(|m| !extract_username(m).is_empty())
                    .count()
            });
        });
    }

    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    c.bench_function("classify_422_member", |b| {
        b.iter(|| {
            InvitationStatus::classify(
                black_box(422),
                black_box(Some("testuser is already a member of the organization.")),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_single_message,
    bench_heuristics_in_isolation,
    bench_message_batches,
    bench_classification
);
criterion_main!(benches);
