
use bpred::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A loop over a handful of strongly-biased branch sites, interleaved with
/// some unconditional jumps. Half the sites lean taken, half lean not-taken.
fn synthetic_trace(seed: u64, len: usize) -> Vec<BranchRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let sites: Vec<(u32, f64)> = (0..32u32)
        .map(|i| (0x1000 + i * 0x24, if i % 2 == 0 { 0.95 } else { 0.05 }))
        .collect();
    (0..len).map(|i| {
        let (pc, bias) = sites[i % sites.len()];
        if i % 17 == 0 {
            let flags = BranchFlags::new(false, true, false, true);
            BranchRecord::new(pc, pc + 0x400, Outcome::T, flags)
        } else {
            let outcome = Outcome::from(rng.gen_bool(bias));
            BranchRecord::conditional(pc, pc + 0x40, outcome)
        }
    }).collect()
}

/// Small tables so that aliasing and allocation are exercised quickly.
fn small_config(scheme: Scheme) -> PredictorConfig {
    let mut cfg = PredictorConfig::new(scheme);
    cfg.gshare.history_bits = 8;
    cfg.tournament = TournamentConfig { global_bits: 6, local_bits: 6 };
    let mut tage = TageConfig::new(TageBaseConfig { index_bits: 6 });
    for history_len in [4, 9, 20, 41] {
        tage.add_component(TageComponentConfig {
            history_len, index_bits: 5, tag_bits: 7,
        });
    }
    tage.reset_period = 512;
    tage.seed = 7;
    cfg.tage = tage;
    cfg
}

/// Returns 'true' when two predictors hold identical tables and histories.
fn same_state(a: &Predictor, b: &Predictor) -> bool {
    match (a, b) {
        (Predictor::Static(_), Predictor::Static(_)) => true,
        (Predictor::Gshare(a), Predictor::Gshare(b)) => {
            a.table() == b.table() && a.history() == b.history()
        },
        (Predictor::Tournament(a), Predictor::Tournament(b)) => a == b,
        (Predictor::Tage(a), Predictor::Tage(b)) => {
            a.base == b.base && a.comp == b.comp
                && a.history() == b.history()
                && a.reset_ctr() == b.reset_ctr()
                && a.stat == b.stat
        },
        _ => false,
    }
}

fn run(p: &mut Predictor, trace: &[BranchRecord]) -> (Vec<Outcome>, usize) {
    let mut predictions = Vec::with_capacity(trace.len());
    let mut hits = 0;
    for record in trace {
        let prediction = p.predict(record.pc);
        if record.is_conditional() && prediction == record.outcome {
            hits += 1;
        }
        predictions.push(prediction);
        p.train(record);
    }
    (predictions, hits)
}

#[rstest]
#[case(Scheme::Static)]
#[case(Scheme::Gshare)]
#[case(Scheme::Tournament)]
#[case(Scheme::Tage)]
fn replaying_a_trace_is_deterministic(#[case] scheme: Scheme) {
    init_logging();
    let trace = synthetic_trace(1, 20_000);
    let cfg = small_config(scheme);

    let mut a = Predictor::configure(&cfg).unwrap();
    let mut b = Predictor::configure(&cfg).unwrap();
    let (pa, _) = run(&mut a, &trace);
    let (pb, _) = run(&mut b, &trace);
    assert_eq!(pa, pb);
    assert!(same_state(&a, &b));
    a.teardown();
    b.teardown();
}

#[rstest]
#[case(Scheme::Gshare)]
#[case(Scheme::Tournament)]
#[case(Scheme::Tage)]
fn adaptive_schemes_beat_the_static_baseline(#[case] scheme: Scheme) {
    init_logging();
    let trace = synthetic_trace(2, 40_000);
    let mut baseline = Predictor::configure(&small_config(Scheme::Static)).unwrap();
    let mut p = Predictor::configure(&small_config(scheme)).unwrap();
    let (_, base_hits) = run(&mut baseline, &trace);
    let (_, hits) = run(&mut p, &trace);
    assert!(hits > base_hits, "{}: {} vs {}", p.name(), hits, base_hits);
}

#[test]
fn injected_rng_is_used_for_allocation() {
    init_logging();
    let trace = synthetic_trace(3, 20_000);
    let cfg = small_config(Scheme::Tage);

    let mut a = Predictor::configure_with_rng(&cfg, StdRng::seed_from_u64(99)).unwrap();
    let mut b = Predictor::configure_with_rng(&cfg, StdRng::seed_from_u64(99)).unwrap();
    run(&mut a, &trace);
    run(&mut b, &trace);
    assert!(same_state(&a, &b));

    let Predictor::Tage(t) = &a else { unreachable!() };
    assert!(t.stat.alcs > 0);
    assert_eq!(t.stat.clk, trace.iter().filter(|r| r.is_conditional()).count());
    assert!(t.stat.msb_resets > 0 && t.stat.lsb_resets > 0);
}

#[test]
fn gshare_history_moves_the_index() {
    init_logging();
    let mut cfg = PredictorConfig::new(Scheme::Gshare);
    cfg.gshare.history_bits = 2;
    let mut p = Predictor::configure(&cfg).unwrap();

    assert_eq!(p.predict(0b01), Outcome::N);
    p.train(&BranchRecord::conditional(0b01, 0x80, Outcome::T));
    {
        let Predictor::Gshare(g) = &p else { unreachable!() };
        assert_eq!(*g.table().get_entry(0b01), CounterState2::WT);
        assert_eq!(g.history().value(), 1);
    }
    // Index is now 01 ^ 01, which has not been trained.
    assert_eq!(p.predict(0b01), Outcome::N);
}

#[test]
fn tournament_chooser_ignores_agreement() {
    init_logging();
    let mut p = Predictor::configure(&small_config(Scheme::Tournament)).unwrap();
    let pc = 0x40;

    // After two taken outcomes both sides read untrained entries, so they
    // agree on not-taken.
    p.train(&BranchRecord::conditional(pc, 0, Outcome::T));
    p.train(&BranchRecord::conditional(pc, 0, Outcome::T));
    let Predictor::Tournament(t) = &mut p else { unreachable!() };
    let before = t.lookup(pc);
    assert_eq!(before.global, Outcome::N);
    assert_eq!(before.local, Outcome::N);
    let chooser = *t.choice_table().get_entry(before.global_idx);
    let global = *t.global_table().get_entry(before.global_idx);
    let local = *t.local_table().get_entry(before.local_idx);

    t.update(pc, !before.global);
    assert_eq!(*t.choice_table().get_entry(before.global_idx), chooser);
    assert_ne!(*t.global_table().get_entry(before.global_idx), global);
    assert_ne!(*t.local_table().get_entry(before.local_idx), local);
}

#[test]
fn configuration_from_json() {
    init_logging();
    let cfg: PredictorConfig = serde_json::from_str(r#"{
        "scheme": "tage",
        "tage": {
            "base": { "index_bits": 8 },
            "comp": [
                { "history_len": 24, "index_bits": 7, "tag_bits": 8 },
                { "history_len": 6,  "index_bits": 7, "tag_bits": 8 }
            ],
            "seed": 3
        }
    }"#).unwrap();
    let mut p = Predictor::configure(&cfg).unwrap();
    assert_eq!(p.name(), "TAGE");
    let Predictor::Tage(t) = &p else { unreachable!() };
    assert_eq!(t.num_tagged_components(), 2);
    assert_eq!(t.comp[0].cfg.history_len, 6);
    assert_eq!(t.history().len(), 24);
    assert_eq!(t.cfg.reset_period, 2_097_152);

    run(&mut p, &synthetic_trace(4, 1000));
    p.teardown();
}

#[test]
fn invalid_configurations_are_rejected() {
    init_logging();
    let mut cfg = small_config(Scheme::Tage);
    cfg.tage.comp[2].tag_bits = 2;
    assert!(matches!(Predictor::configure(&cfg),
        Err(ConfigError::TagTooNarrow { component: 2, bits: 2, .. })));

    let mut cfg = small_config(Scheme::Tournament);
    cfg.tournament.local_bits = 40;
    assert!(matches!(Predictor::configure(&cfg),
        Err(ConfigError::TableTooLarge { bits: 40, .. })));

    // Only the active scheme is checked.
    let mut cfg = small_config(Scheme::Gshare);
    cfg.tage.comp.clear();
    assert!(Predictor::configure(&cfg).is_ok());
}
