/// Marker for a model that is **not yet trained**.
///
/// `LinearClassifier<Unfitted>` implements [`TrainableModel`](super::TrainableModel)
/// and can be handed to a [`Trainer`](crate::training::Trainer); it has no
/// prediction methods.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// Marker for a model that has been **fully trained**.
///
/// A `Fitted` model carries only inference parameters (weights, bias, link),
/// never optimizer state or training hyperparameters, and is what gets
/// serialized into an artifact.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;
