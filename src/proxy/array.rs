//! Contiguous array proxy

use crate::core::types::{RemoteAddress, Result};
use crate::process::TargetProcess;
use crate::proxy::{RemoteProxy, RemoteStruct};
use std::marker::PhantomData;
use std::sync::Arc;

/// A contiguous run of same-typed struct proxies at increasing offsets.
///
/// The array stores no length; callers supply the element count, usually
/// derived from another field such as a hash table's mask. The stride is
/// the element layout's size, resolved once at bind time. Neither binding
/// nor `take` reads target memory; costs are paid only when an element is
/// read through.
pub struct ArrayProxy<T> {
    process: Arc<TargetProcess>,
    base: RemoteAddress,
    stride: usize,
    _element: PhantomData<fn() -> T>,
}

impl<T: RemoteStruct> RemoteProxy for ArrayProxy<T> {
    fn bind(process: Arc<TargetProcess>, address: RemoteAddress) -> Result<Self> {
        let stride = process.layout(T::LAYOUT)?.size();
        Ok(ArrayProxy {
            process,
            base: address,
            stride,
            _element: PhantomData,
        })
    }

    fn address(&self) -> RemoteAddress {
        self.base
    }

    fn process(&self) -> &Arc<TargetProcess> {
        &self.process
    }
}

impl<T: RemoteStruct> ArrayProxy<T> {
    /// Element stride in bytes
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Binds the element proxy at `base + index * stride`. No bounds
    /// check: the caller owns the count.
    pub fn at(&self, index: usize) -> Result<T> {
        T::bind(
            Arc::clone(&self.process),
            self.base.offset((index * self.stride) as u64),
        )
    }

    /// Lazy, finite, restartable sequence of the first `count` elements
    pub fn take(&self, count: usize) -> impl Iterator<Item = Result<T>> + '_ {
        (0..count).map(move |index| self.at(index))
    }
}

impl<T> std::fmt::Debug for ArrayProxy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayProxy")
            .field("base", &self.base)
            .field("stride", &self.stride)
            .finish()
    }
}

impl<T> Clone for ArrayProxy<T> {
    fn clone(&self) -> Self {
        ArrayProxy {
            process: Arc::clone(&self.process),
            base: self.base,
            stride: self.stride,
            _element: PhantomData,
        }
    }
}
