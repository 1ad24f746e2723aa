use anyhow::Result;
use discor_core::{
    error::DiscorError,
    record::{BufferedRecorder, NullRecorder},
    Learner, TransitionBatch,
};
use discor_tch_agent::{
    discor::CorrectionConfig,
    sac::{ActorConfig, CriticConfig, Sac, SacConfig},
    Mlp, Mlp2, MlpConfig, OptimizerConfig,
};
use tempdir::TempDir;

const STATE_DIM: i64 = 3;
const ACTION_DIM: i64 = 2;
const LR: f64 = 3e-4;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(corrected: bool, log_interval: usize, seed: i64) -> SacConfig<Mlp, Mlp2> {
    let mut config = SacConfig::<Mlp, Mlp2>::default()
        .actor_config(
            ActorConfig::default()
                .pi_config(MlpConfig::new(STATE_DIM, vec![16, 16], ACTION_DIM))
                .opt_config(OptimizerConfig::Adam { lr: LR }),
        )
        .critic_config(
            CriticConfig::default()
                .q_config(MlpConfig::new(STATE_DIM + ACTION_DIM, vec![16, 16], 1))
                .opt_config(OptimizerConfig::Adam { lr: LR }),
        )
        .log_interval(log_interval)
        .seed(seed);
    if corrected {
        config = config.correction(
            CorrectionConfig::default()
                .error_config(MlpConfig::new(STATE_DIM + ACTION_DIM, vec![16, 16, 16], 1))
                .opt_config(OptimizerConfig::Adam { lr: LR }),
        );
    }
    config
}

fn batch() -> TransitionBatch {
    TransitionBatch {
        batch_size: 4,
        state_dim: STATE_DIM as usize,
        action_dim: ACTION_DIM as usize,
        states: vec![0.1; 12],
        actions: vec![0.0; 8],
        rewards: vec![1.0; 4],
        next_states: vec![0.2; 12],
        dones: vec![0.0, 0.0, 0.0, 1.0],
    }
}

#[test]
fn step_counter_and_log_gating() -> Result<()> {
    init();
    let mut agent = Sac::build(config(true, 3, 0))?;
    let mut recorder = BufferedRecorder::new();

    for _ in 0..7 {
        agent.learn(&batch(), &mut recorder)?;
    }

    assert_eq!(agent.n_steps(), 7);
    // Records fire at steps 3 and 6 only.
    let steps: Vec<usize> = recorder.iter().map(|(step, _)| *step).collect();
    assert_eq!(steps, vec![3, 6]);
    Ok(())
}

#[test]
fn explore_is_stochastic_and_exploit_is_deterministic() -> Result<()> {
    init();
    let mut agent = Sac::build(config(false, 10, 1))?;
    let state = vec![0.5f32; STATE_DIM as usize];

    let a1 = agent.exploit(&state)?;
    let a2 = agent.exploit(&state)?;
    assert_eq!(a1.len(), ACTION_DIM as usize);
    assert_eq!(a1, a2);
    for a in a1.iter() {
        assert!(*a >= -1.0 && *a <= 1.0);
    }

    let e1 = agent.explore(&state)?;
    let e2 = agent.explore(&state)?;
    assert_eq!(e1.len(), ACTION_DIM as usize);
    assert_ne!(e1, e2);
    Ok(())
}

#[test]
fn malformed_batch_aborts_the_step() -> Result<()> {
    init();
    let mut agent = Sac::build(config(false, 10, 2))?;
    let mut recorder = NullRecorder {};

    let mut b = batch();
    b.actions.pop();
    let err = agent.learn(&b, &mut recorder).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DiscorError>(),
        Some(DiscorError::ShapeMismatch(_))
    ));
    Ok(())
}

#[test]
fn non_finite_loss_is_detected_before_the_critic_update() -> Result<()> {
    init();
    let mut agent = Sac::build(config(false, 10, 3))?;
    let mut recorder = NullRecorder {};

    let mut b = batch();
    b.rewards = vec![f32::NAN; 4];
    let err = agent.learn(&b, &mut recorder).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DiscorError>(),
        Some(DiscorError::NumericalInstability(_))
    ));
    Ok(())
}

#[test]
fn save_and_load_round_trip() -> Result<()> {
    init();
    let mut recorder = NullRecorder {};
    let mut agent = Sac::build(config(true, 10, 4))?;
    for _ in 0..3 {
        agent.learn(&batch(), &mut recorder)?;
        agent.update_target();
    }

    let dir = TempDir::new("discor_sac")?;
    agent.save(dir.path())?;

    // A freshly built agent behaves differently until it loads the
    // saved weights.
    let mut other = Sac::build(config(true, 10, 5))?;
    let state = vec![0.5f32; STATE_DIM as usize];
    assert_ne!(agent.exploit(&state)?, other.exploit(&state)?);

    other.load(dir.path())?;
    assert_eq!(agent.exploit(&state)?, other.exploit(&state)?);
    Ok(())
}

#[test]
fn config_round_trips_through_yaml() -> Result<()> {
    init();
    let config = config(true, 5, 7);

    let dir = TempDir::new("discor_config")?;
    let path = dir.path().join("sac.yaml");
    config.save(&path)?;
    let loaded = SacConfig::<Mlp, Mlp2>::load(&path)?;

    assert_eq!(config, loaded);
    Ok(())
}

#[test]
fn discor_learning_is_stable_over_many_steps() -> Result<()> {
    init();
    let mut agent = Sac::build(config(true, 1, 6))?;
    let mut recorder = BufferedRecorder::new();

    for _ in 0..20 {
        agent.learn(&batch(), &mut recorder)?;
        agent.update_target();
    }

    assert_eq!(recorder.len(), 20);
    for (_, record) in recorder.iter() {
        for key in ["loss/policy", "loss/Q", "loss/error", "stats/tau1"].iter() {
            assert!(record.get_scalar(key)?.is_finite());
        }
    }
    Ok(())
}
