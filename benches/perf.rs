use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use anyhow::Result;
use match_route::{
    CodecConfig, MatchRouteParams, RouteCodec, build_route, escape_segment, resolve_color,
    unescape_segment,
};

fn sample_params() -> MatchRouteParams {
    MatchRouteParams {
        access_code: "ABC123".to_string(),
        location: Some("Sân vận động Mỹ Đình".to_string()),
        match_title: Some("Giải vô địch / Chung kết".to_string()),
        live_text: Some("TRỰC TIẾP".to_string()),
        team_a_logo_code: Some("HN".to_string()),
        team_b_logo_code: Some("TPHCM".to_string()),
        team_a_name: Some("Hà Nội FC".to_string()),
        team_b_name: Some("TP. Hồ Chí Minh".to_string()),
        team_a_kit_color: Some("đỏ".to_string()),
        team_b_kit_color: Some("#0000FF".to_string()),
        team_a_score: Some(2),
        team_b_score: Some(1),
        view: Some("tisoduoi".to_string()),
        match_time: Some("67:12".to_string()),
    }
}

fn bench_build(c: &mut Criterion) {
    let params = sample_params();
    c.bench_function("build_route", |b| {
        b.iter(|| build_route(black_box(&params)).expect("valid params"))
    });
}

fn bench_decode(c: &mut Criterion) {
    let codec = RouteCodec::new(CodecConfig::default(), |_: &str| -> Result<Option<String>> {
        Ok(None)
    });
    let path = build_route(&sample_params()).expect("valid params");
    c.bench_function("decode_route", |b| {
        b.iter(|| codec.decode_route(black_box(&path)).expect("well shaped"))
    });
    c.bench_function("parse_route_with_logos", |b| {
        b.iter(|| codec.parse_route(black_box(&path)).expect("well shaped"))
    });
}

fn bench_text(c: &mut Criterion) {
    let title = "Giải vô địch quốc gia / Vòng 26 & Chung kết 100%";
    let escaped = escape_segment(title);
    c.bench_function("escape_segment", |b| {
        b.iter(|| escape_segment(black_box(title)))
    });
    c.bench_function("unescape_segment", |b| {
        b.iter(|| unescape_segment(black_box(&escaped)))
    });
    c.bench_function("resolve_color_alias", |b| {
        b.iter(|| resolve_color(black_box("xanh da trời")))
    });
}

criterion_group!(benches, bench_build, bench_decode, bench_text);
criterion_main!(benches);
