use crate::error::{OptimizerError, Result};
use crate::search::queue::{Pop, WorkQueue};
use crate::search::{expected_leaf_count, LeafStore};
use crate::settings::ChipSet;
use crate::squad::SquadState;
use crate::strategy::{node_seed, path_id, PathState, StrategyRecord};
use crate::transfers::{Chip, ChipSchedule, SearchContext, TransferDirective, CHIP_TRANSFER_OPTIONS};
use log::{debug, error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// One queued branch: the directives leading to it (the last one not yet
/// applied) and the state of its parent.
#[derive(Debug, Clone)]
struct TreeNode {
    path: Vec<TransferDirective>,
    state: PathState,
    record: StrategyRecord,
}

impl TreeNode {
    fn chips_used(&self) -> Vec<Chip> {
        self.path.iter().filter_map(|d| d.chip()).collect()
    }

    /// Directives playable next along this path.
    fn children(&self, enabled: ChipSet) -> Vec<TransferDirective> {
        let used = self.chips_used();
        let available = |chip: Chip, enabled: bool| enabled && !used.contains(&chip);

        let mut children: Vec<TransferDirective> = (0..3).map(TransferDirective::from_count).collect();

        if available(Chip::TripleCaptain, enabled.triple_captain) {
            children.extend(CHIP_TRANSFER_OPTIONS.map(TransferDirective::TripleCaptain));
        }
        if available(Chip::BenchBoost, enabled.bench_boost) {
            children.extend(CHIP_TRANSFER_OPTIONS.map(TransferDirective::BenchBoost));
        }
        if available(Chip::Wildcard, enabled.wildcard) {
            children.push(TransferDirective::Wildcard);
        }
        if available(Chip::FreeHit, enabled.free_hit) {
            children.push(TransferDirective::FreeHit);
        }

        children
    }
}

/// Closes the queue if the owning worker unwinds, so the others stop waiting.
struct CloseOnPanic<'q, T>(&'q WorkQueue<T>);

impl<T> Drop for CloseOnPanic<'_, T> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.close();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    pub leaves: u64,
    pub elapsed: Duration,
}

/// Explores every transfer plan over the horizon with a pool of workers and
/// persists one record per complete plan.
pub struct StrategyTreeSearch<'a> {
    ctx: SearchContext<'a>,
    store: &'a dyn LeafStore,
}

impl<'a> StrategyTreeSearch<'a> {
    pub fn new(ctx: SearchContext<'a>, store: &'a dyn LeafStore) -> Self {
        StrategyTreeSearch { ctx, store }
    }

    pub fn expected_leaves(&self) -> u64 {
        expected_leaf_count(self.ctx.settings.gameweeks.len(), self.ctx.settings.chips)
    }

    pub fn run(&self, starting_squad: SquadState, free_transfers: u8) -> Result<SearchSummary> {
        let settings = self.ctx.settings;
        settings.validate()?;

        let started = Instant::now();
        let expected = self.expected_leaves();

        self.store.clear(&settings.tag)?;

        info!(
            "exploring {} strategies over gameweeks {:?} with {} workers",
            expected, settings.gameweeks, settings.workers
        );

        let queue = WorkQueue::new();
        queue.push(TreeNode {
            path: Vec::new(),
            state: PathState::new(starting_squad, free_transfers),
            record: StrategyRecord::new(),
        });

        let persisted = AtomicU64::new(0);

        let outcomes: Vec<Result<()>> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(settings.workers);

            for index in 0..settings.workers {
                let spawned = thread::Builder::new()
                    .name(format!("strategy-worker-{}", index))
                    .spawn_scoped(scope, || self.worker(&queue, expected, &persisted));

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        queue.close();
                        return vec![Err(OptimizerError::Io(e))];
                    }
                }
            }

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|panic| {
                        let message = panic
                            .downcast_ref::<&str>()
                            .map(|s| s.to_string())
                            .or_else(|| panic.downcast_ref::<String>().cloned())
                            .unwrap_or_else(|| "unknown panic".to_string());
                        Err(OptimizerError::WorkerPanicked(message))
                    })
                })
                .collect()
        });

        for outcome in outcomes {
            outcome?;
        }

        let found = self.store.count(&settings.tag)?;
        if found != expected {
            return Err(OptimizerError::IncompleteSearch { expected, found });
        }

        let elapsed = started.elapsed();
        info!("explored {} strategies in {} ms", found, elapsed.as_millis());

        Ok(SearchSummary {
            leaves: found,
            elapsed,
        })
    }

    fn worker(&self, queue: &WorkQueue<TreeNode>, expected: u64, persisted: &AtomicU64) -> Result<()> {
        let _guard = CloseOnPanic(queue);
        let poll_interval = Duration::from_millis(self.ctx.settings.poll_interval_ms);
        let tag = self.ctx.tag();

        loop {
            match queue.pop(poll_interval) {
                Pop::Item(node) => {
                    let processed = self.process(node, queue, expected, persisted);
                    queue.task_done();

                    if let Err(e) = processed {
                        error!("strategy worker failed: {}", e);
                        queue.close();
                        return Err(e);
                    }
                }
                Pop::Empty { in_flight } => {
                    let found = match self.store.count(tag) {
                        Ok(found) => found,
                        Err(e) => {
                            queue.close();
                            return Err(e);
                        }
                    };

                    if found == expected {
                        queue.close();
                        return Ok(());
                    }

                    // nothing queued and nothing running: no more leaves will come
                    if in_flight == 0 {
                        queue.close();
                        return Err(OptimizerError::IncompleteSearch { expected, found });
                    }
                }
                Pop::Closed => return Ok(()),
            }
        }
    }

    fn process(
        &self,
        mut node: TreeNode,
        queue: &WorkQueue<TreeNode>,
        expected: u64,
        persisted: &AtomicU64,
    ) -> Result<()> {
        let gameweeks = &self.ctx.settings.gameweeks;
        let id = path_id(&node.path);

        if let Some(&directive) = node.path.last() {
            let index = node.path.len() - 1;
            let chips = ChipSchedule::for_directive(directive, gameweeks[index]);
            let mut rng = ChaCha8Rng::seed_from_u64(node_seed(self.ctx.settings.seed, &id));

            debug!("processing strategy {}", id);

            let result = node
                .state
                .apply_gameweek(directive, index, gameweeks, &chips, &self.ctx, &mut rng)?;
            node.record.record(result);
        }

        if node.path.len() >= gameweeks.len() {
            self.store.persist(self.ctx.tag(), &id, &node.record)?;

            let done = persisted.fetch_add(1, Ordering::Relaxed) + 1;
            let step = (expected / 20).max(1);
            if done % step == 0 || done == expected {
                info!("{}/{} strategies done", done, expected);
            }

            return Ok(());
        }

        let children = node.children(self.ctx.settings.chips);
        queue.push_all(children.into_iter().map(|directive| {
            let mut path = node.path.clone();
            path.push(directive);

            TreeNode {
                path,
                state: node.state.clone(),
                record: node.record.clone(),
            }
        }));

        Ok(())
    }
}
