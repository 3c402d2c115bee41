use super::*;

fn fps(n: u32) -> Fps {
    Fps::new(n, 1).unwrap()
}

#[test]
fn select_frames_floors_source_positions() {
    assert_eq!(FpsDivisor::ONE.select_frames(4), vec![0, 1, 2, 3]);
    assert_eq!(FpsDivisor { num: 2, den: 1 }.select_frames(5), vec![0, 2, 4]);
    assert_eq!(
        FpsDivisor { num: 3, den: 2 }.select_frames(7),
        vec![0, 1, 3, 4, 6]
    );
    assert!(FpsDivisor { num: 4, den: 1 }.select_frames(0).is_empty());
}

#[test]
fn score_is_monotone_in_each_axis() {
    let base = score(1.0, 30, FpsDivisor::ONE);
    assert!(score(0.75, 30, FpsDivisor::ONE) < base);
    assert!(score(1.0, 34, FpsDivisor::ONE) < base);
    assert!(score(1.0, 30, FpsDivisor { num: 3, den: 2 }) < base);
}

#[test]
fn divisors_unlock_only_above_minimum_rate() {
    let at_30 = unlocked_divisors(fps(30), 10.0);
    assert_eq!(at_30.len(), 5);
    assert!(!at_30.contains(&FpsDivisor { num: 4, den: 1 }));

    let at_12 = unlocked_divisors(fps(12), 10.0);
    assert_eq!(at_12, vec![FpsDivisor::ONE]);

    let at_8 = unlocked_divisors(fps(8), 10.0);
    assert_eq!(at_8, vec![FpsDivisor::ONE]);
}

#[test]
fn candidates_are_sorted_by_descending_score() {
    let cfg = SearchConfig {
        crf_min: 20,
        crf_max: 40,
        crf_step: 10,
        scales: vec![1.0, 0.5],
        ..SearchConfig::default()
    };
    let candidates = build_candidates(fps(30), Canvas::square(512), &cfg).unwrap();
    assert_eq!(candidates.len(), 2 * 3 * 5);
    assert!(candidates.windows(2).all(|w| w[0].score >= w[1].score));

    let first = &candidates[0];
    assert_eq!(first.crf, 20);
    assert_eq!(first.divisor, FpsDivisor::ONE);
    assert_eq!(first.canvas, Canvas::square(512));
    assert_eq!(first.fps, fps(30));
}

#[test]
fn candidates_carry_divided_rate_and_scaled_canvas() {
    let cfg = SearchConfig {
        crf_min: 30,
        crf_max: 30,
        scales: vec![0.5],
        ..SearchConfig::default()
    };
    let candidates = build_candidates(fps(30), Canvas::square(100), &cfg).unwrap();
    let halved = candidates
        .iter()
        .find(|c| c.divisor == FpsDivisor { num: 3, den: 2 })
        .unwrap();
    assert_eq!(halved.fps, fps(20));
    assert_eq!(halved.canvas, Canvas::square(50));
}

#[test]
fn build_candidates_rejects_odd_canvas() {
    let cfg = SearchConfig::default();
    assert!(build_candidates(fps(30), Canvas::square(99), &cfg).is_err());
}
