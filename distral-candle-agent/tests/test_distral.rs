use anyhow::Result;
use candle_core::{DType, Device as CandleDevice, Tensor};
use distral_candle_agent::{
    cnn::{GridCnn, GridCnnConfig},
    distral::{Distral, DistralConfig, NetworkConfig},
    mlp::{Mlp, MlpConfig},
    opt::OptimizerConfig,
    Activation, Device,
};
use distral_core::{
    error::DistralError,
    replay_memory::{ReplayMemory, ReplayMemoryConfig},
    ExperienceBufferBase, Hyperparams, NullClustering, Transition,
};
use tempdir::TempDir;
use test_log::test;

const N_AGENTS: usize = 2;
const N_ACTIONS: usize = 3;
const DIM_OBS: usize = 4;

fn mlp_config(batch_size: usize) -> DistralConfig<MlpConfig, MlpConfig> {
    DistralConfig::default()
        .value_config(
            NetworkConfig::default()
                .model_config(MlpConfig::new(DIM_OBS, vec![16], N_ACTIONS, Activation::None))
                .opt_config(OptimizerConfig::Adam { lr: 1e-3 }),
        )
        .policy_config(
            NetworkConfig::default()
                .model_config(MlpConfig::new(DIM_OBS, vec![16], N_ACTIONS, Activation::Softmax))
                .opt_config(OptimizerConfig::Adam { lr: 1e-3 }),
        )
        .hyperparams(Hyperparams::default().batch_size(batch_size))
        .n_agents(N_AGENTS)
        .n_actions(N_ACTIONS)
        .device(Device::Cpu)
}

fn obs(agent_id: usize, t: u32) -> Tensor {
    let x = t as f32 / 10.0;
    let v = [x, -x, agent_id as f32, 1.0];
    Tensor::from_slice(&v, (DIM_OBS,), &CandleDevice::Cpu).unwrap()
}

/// Rolls out episodes of fixed length with actions drawn from the agent.
fn collect(
    distral: &mut Distral<Mlp, Mlp>,
    agent_id: usize,
    memory: &mut ReplayMemory<Tensor>,
    n_steps: usize,
) -> Result<()> {
    const EPISODE_LEN: u32 = 5;
    let mut t = 0;
    for step in 0..n_steps {
        let state = obs(agent_id, t);
        let action = distral.sample(agent_id, &state, step)?;
        assert!((0..N_ACTIONS as i64).contains(&action));

        let reward = if action == agent_id as i64 { 1.0 } else { 0.0 };
        let next_state = match t + 1 == EPISODE_LEN {
            true => None,
            false => Some(obs(agent_id, t + 1)),
        };
        memory.push(Transition::new(state, action, next_state, reward, t, agent_id))?;
        t = (t + 1) % EPISODE_LEN;
    }
    Ok(())
}

fn memories() -> Vec<ReplayMemory<Tensor>> {
    (0..N_AGENTS)
        .map(|i| ReplayMemory::build(&ReplayMemoryConfig::default().capacity(1000).seed(i as u64)))
        .collect()
}

fn zero_params(varmap: &candle_nn::VarMap) -> Result<()> {
    for var in varmap.all_vars() {
        var.set(&var.zeros_like()?)?;
    }
    Ok(())
}

#[test]
fn test_training_loop() -> Result<()> {
    let mut distral = Distral::<Mlp, Mlp>::build(mlp_config(16))?;
    let mut memories = memories();

    for _ in 0..3 {
        for (i, memory) in memories.iter_mut().enumerate() {
            collect(&mut distral, i, memory, 20)?;
            let record = distral
                .opt_agent(i, memory)?
                .expect("memory holds a full batch");
            let loss = record.get_scalar("loss_critic")?;
            assert!(loss.is_finite() && loss >= 0.0);
            assert!(record.get_scalar("grad_max_abs")? <= 500.0);
        }
        distral.opt_policy(&mut memories)?;
    }

    assert_eq!(distral.policy().version(), 3);
    assert_eq!(distral.whole_memory().len(), N_AGENTS * 16);

    let whole_memory = distral.take_whole_memory();
    assert_eq!(whole_memory.len(), N_AGENTS * 16);
    assert!(distral.whole_memory().is_empty());
    Ok(())
}

#[test]
fn test_whole_memory_holds_latest_pass() -> Result<()> {
    let mut distral = Distral::<Mlp, Mlp>::build(mlp_config(16))?;
    let mut memories = memories();
    for (i, memory) in memories.iter_mut().enumerate() {
        collect(&mut distral, i, memory, 32)?;
    }

    for _ in 0..50 {
        distral.opt_policy(&mut memories)?;
        assert_eq!(distral.whole_memory().len(), N_AGENTS * 16);
    }
    assert_eq!(distral.policy().version(), 50);

    let agent_ids = &distral.whole_memory().agent_ids;
    assert!(agent_ids[..16].iter().all(|&i| i == 0));
    assert!(agent_ids[16..].iter().all(|&i| i == 1));
    Ok(())
}

#[test]
fn test_warm_up_is_no_op() -> Result<()> {
    let mut distral = Distral::<Mlp, Mlp>::build(mlp_config(32))?;
    let mut memories = memories();
    collect(&mut distral, 0, &mut memories[0], 31)?;

    assert!(distral.opt_agent(0, &mut memories[0])?.is_none());
    collect(&mut distral, 0, &mut memories[0], 1)?;
    assert!(distral.opt_agent(0, &mut memories[0])?.is_some());
    Ok(())
}

#[test]
fn test_zero_networks_sample_uniformly() -> Result<()> {
    const N: usize = 4;
    let config = DistralConfig::default()
        .value_config(
            NetworkConfig::default()
                .model_config(MlpConfig::new(DIM_OBS, vec![16], N, Activation::None)),
        )
        .policy_config(
            NetworkConfig::default()
                .model_config(MlpConfig::new(DIM_OBS, vec![16], N, Activation::Softmax)),
        )
        .hyperparams(Hyperparams::default().alpha(1.0).beta(1.0))
        .n_agents(1)
        .n_actions(N)
        .seed(123);
    let mut distral = Distral::<Mlp, Mlp>::build(config)?;
    zero_params(distral.model(0)?.get_varmap())?;
    zero_params(distral.policy().get_varmap())?;

    let n = 40000;
    let mut counts = [0usize; N];
    for step in 0..n {
        let a = distral.sample(0, &obs(0, 1), step)?;
        counts[a as usize] += 1;
    }

    for c in counts.iter() {
        let freq = *c as f64 / n as f64;
        assert!((freq - 0.25).abs() < 0.01, "{:?}", counts);
    }
    Ok(())
}

#[test]
fn test_unknown_agent() -> Result<()> {
    let mut distral = Distral::<Mlp, Mlp>::build(mlp_config(16))?;
    let mut memory: ReplayMemory<Tensor> = ReplayMemory::build(&ReplayMemoryConfig::default());

    let err = distral.sample(N_AGENTS, &obs(0, 0), 0).unwrap_err();
    assert_eq!(
        err.downcast_ref::<DistralError>(),
        Some(&DistralError::UnknownAgent {
            agent_id: N_AGENTS,
            n_agents: N_AGENTS
        })
    );
    assert!(distral.opt_agent(N_AGENTS, &mut memory).is_err());
    assert!(distral.model(N_AGENTS).is_err());
    Ok(())
}

#[test]
fn test_invalid_config() {
    let config = mlp_config(16).hyperparams(Hyperparams::default().alpha(-1.0));
    assert!(Distral::<Mlp, Mlp>::build(config).is_err());

    let config = mlp_config(16).n_actions(N_ACTIONS + 1);
    assert!(Distral::<Mlp, Mlp>::build(config).is_err());
}

#[test]
fn test_clustering_is_unavailable() -> Result<()> {
    let mut distral = Distral::<Mlp, Mlp>::build(mlp_config(4))?;
    let mut memories = memories();
    for (i, memory) in memories.iter_mut().enumerate() {
        collect(&mut distral, i, memory, 8)?;
    }
    distral.opt_policy(&mut memories)?;

    let err = distral.cluster(&NullClustering).unwrap_err();
    assert_eq!(
        err.downcast_ref::<DistralError>(),
        Some(&DistralError::ClusteringUnavailable)
    );
    Ok(())
}

#[test]
fn test_save_load() -> Result<()> {
    let mut distral1 = Distral::<Mlp, Mlp>::build(mlp_config(8))?;
    let mut distral2 = Distral::<Mlp, Mlp>::build(mlp_config(8))?;
    let mut memories = memories();
    for (i, memory) in memories.iter_mut().enumerate() {
        collect(&mut distral1, i, memory, 8)?;
        distral1.opt_agent(i, memory)?;
    }
    distral1.opt_policy(&mut memories)?;

    let dir = TempDir::new("distral")?;
    let paths = distral1.save(dir.path())?;
    assert_eq!(paths.len(), N_AGENTS + 1);
    distral2.load(dir.path())?;

    let xs = obs(1, 2).unsqueeze(0)?;
    for i in 0..N_AGENTS {
        let q1: Vec<f32> = distral1.model(i)?.forward(&xs, false)?.flatten_all()?.to_vec1()?;
        let q2: Vec<f32> = distral2.model(i)?.forward(&xs, false)?.flatten_all()?.to_vec1()?;
        assert_eq!(q1, q2);
    }
    let p1: Vec<f32> = distral1.policy().forward(&xs, false)?.flatten_all()?.to_vec1()?;
    let p2: Vec<f32> = distral2.policy().forward(&xs, false)?.flatten_all()?.to_vec1()?;
    assert_eq!(p1, p2);
    Ok(())
}

#[test]
fn test_grid_observations() -> Result<()> {
    let (h, w) = (7, 7);
    let config: DistralConfig<GridCnnConfig, GridCnnConfig> = DistralConfig::default()
        .value_config(
            NetworkConfig::default().model_config(GridCnnConfig::new(h, w, 4, Activation::None)),
        )
        .policy_config(
            NetworkConfig::default().model_config(GridCnnConfig::new(h, w, 4, Activation::LeakySoftmax)),
        )
        .hyperparams(Hyperparams::default().batch_size(4))
        .n_agents(1)
        .n_actions(4);
    let mut distral = Distral::<GridCnn, GridCnn>::build(config)?;
    let mut memories = vec![ReplayMemory::build(&ReplayMemoryConfig::default())];

    for t in 0..6u32 {
        let state = Tensor::zeros((h, w), DType::F32, &CandleDevice::Cpu)?;
        let action = distral.sample(0, &state, t as usize)?;
        let next_state = match t % 3 == 2 {
            true => None,
            false => Some(Tensor::ones((h, w), DType::F32, &CandleDevice::Cpu)?),
        };
        memories[0].push(Transition::new(state, action, next_state, 1.0, t % 3, 0))?;
    }

    assert!(distral.opt_agent(0, &mut memories[0])?.is_some());
    let record = distral.opt_policy(&mut memories)?;
    assert_eq!(record.get_scalar("n_samples")?, 4.0);
    Ok(())
}
