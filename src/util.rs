//! Async helpers

use std::future::Future;

/// Run `f` once per item, awaiting each call before starting the next
///
/// Works with any `IntoIterator`: a `Vec` yields its elements, a map yields
/// `(key, value)` pairs. Outputs are collected in iteration order. The first
/// error stops the iteration and is returned; later items are not visited.
pub async fn for_each_sequential<I, F, Fut, T, E>(items: I, mut f: F) -> Result<Vec<T>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let iter = items.into_iter();
    let mut outputs = Vec::with_capacity(iter.size_hint().0);

    for item in iter {
        outputs.push(f(item).await?);
    }

    Ok(outputs)
}
