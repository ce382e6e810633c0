use crate::element::element_model::ElementDescriptor;

/// One worker's share of the element list.
#[derive(Debug)]
pub struct BatchJob {
    pub batch_id: usize,
    pub elements: Vec<ElementDescriptor>,
}

/// Split elements into at most `workers` contiguous batches.
///
/// Every batch gets `total / workers` elements and the remainder is spread
/// one element each over the leading batches, so batch sizes never differ
/// by more than one. Empty batches are dropped rather than handed a worker.
pub fn partition(elements: Vec<ElementDescriptor>, workers: usize) -> Vec<BatchJob> {
    let workers = workers.max(1);
    let total = elements.len();
    let base = total / workers;
    let remainder = total % workers;

    let mut batches = Vec::new();
    let mut iter = elements.into_iter();
    for batch_id in 0..workers {
        let size = base + usize::from(batch_id < remainder);
        if size == 0 {
            continue;
        }
        let batch: Vec<ElementDescriptor> = iter.by_ref().take(size).collect();
        batches.push(BatchJob {
            batch_id,
            elements: batch,
        });
    }
    batches
}
