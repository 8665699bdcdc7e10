//! Checkpoint callbacks

/// Read-only view of training at a checkpoint
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CheckpointContext {
    /// Epoch of the checkpoint (0-indexed); equals `epochs` for the final call
    pub epoch: usize,
    /// Total epochs planned
    pub epochs: usize,
    /// Checkpoints recorded so far
    pub hist_size: usize,
    pub d_loss: f32,
    pub g_loss: f32,
    /// Mean metric of this checkpoint, absent when history is not collected
    pub metric: Option<f32>,
    pub best_metric: Option<f32>,
    /// Growth stage (progressive trainer only)
    pub stage: usize,
    /// Set for the single call after the last epoch
    pub is_final: bool,
}

/// Hook invoked after every checkpoint's bookkeeping and once after training
pub trait CheckpointCallback {
    fn on_checkpoint(&mut self, ctx: &CheckpointContext);
}

impl<F> CheckpointCallback for F
where
    F: FnMut(&CheckpointContext),
{
    fn on_checkpoint(&mut self, ctx: &CheckpointContext) {
        self(ctx);
    }
}

/// Adapts a zero-argument closure
pub struct FnCallback<F>(pub F);

impl<F: FnMut()> CheckpointCallback for FnCallback<F> {
    fn on_checkpoint(&mut self, _ctx: &CheckpointContext) {
        (self.0)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_callback_sees_context() {
        let mut seen = Vec::new();
        {
            let mut callback = |ctx: &CheckpointContext| seen.push((ctx.epoch, ctx.is_final));
            callback.on_checkpoint(&CheckpointContext { epoch: 3, ..CheckpointContext::default() });
            callback.on_checkpoint(&CheckpointContext { epoch: 5, is_final: true, ..CheckpointContext::default() });
        }
        assert_eq!(seen, vec![(3, false), (5, true)]);
    }

    #[test]
    fn test_fn_callback() {
        let mut calls = 0;
        let mut callback = FnCallback(|| calls += 1);
        callback.on_checkpoint(&CheckpointContext::default());
        callback.on_checkpoint(&CheckpointContext::default());
        drop(callback);
        assert_eq!(calls, 2);
    }
}
