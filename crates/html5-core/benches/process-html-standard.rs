use html5_core::Options;

fn main() {
    divan::main();
}

#[divan::bench]
fn bench_parse_spec(bencher: divan::Bencher) {
    let input = std::fs::read("../../data/html-standard.html").expect("Missing input!");

    bencher.bench(|| {
        let result = html5_core::parse_bytes(&input, Options::new());
        std::hint::black_box(result.dom);
    });
}
