//! Aligned memory and whole-vector loads and stores
//!
//! Vector memory access requires the start address to be aligned to the
//! backend's native width. The safe entry points take [`Aligned`] and
//! [`AlignedMut`] views, which check alignment once when they are built;
//! the raw-pointer variants leave it to the caller.

use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use tracing::trace;

use crate::backend::{Active, Backend};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::vector::Vector;

/// Largest alignment any backend requires
pub const MAX_ALIGN: usize = 32;

#[repr(C, align(32))]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Chunk([u8; MAX_ALIGN]);

/// Heap buffer of `T` whose start is aligned for every backend
pub struct AlignedBuffer<T: Element> {
    chunks: Vec<Chunk>,
    len: usize,
    element: PhantomData<T>,
}

impl<T: Element> AlignedBuffer<T> {
    /// `len` zeroed elements
    pub fn zeroed(len: usize) -> Self {
        let bytes = len * T::SIZE;
        let chunks = vec![Chunk::zeroed(); bytes.div_ceil(MAX_ALIGN)];
        trace!(len, element = %T::KIND, chunks = chunks.len(), "allocated aligned buffer");
        Self {
            chunks,
            len,
            element: PhantomData,
        }
    }

    /// Aligned copy of `data`
    pub fn from_slice(data: &[T]) -> Self {
        let mut buffer = Self::zeroed(data.len());
        buffer.as_mut_slice().copy_from_slice(data);
        buffer
    }

    /// Aligned copy of raw element bytes in native byte order
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % T::SIZE != 0 {
            return Err(Error::invalid_input(format!(
                "{} bytes is not a whole number of {} elements",
                bytes.len(),
                T::KIND
            )));
        }
        let mut buffer = Self::zeroed(bytes.len() / T::SIZE);
        buffer.as_bytes_mut().copy_from_slice(bytes);
        Ok(buffer)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The elements
    pub fn as_slice(&self) -> &[T] {
        let elements: &[T] = bytemuck::cast_slice(&self.chunks[..]);
        &elements[..self.len]
    }

    /// The elements, mutably
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let elements: &mut [T] = bytemuck::cast_slice_mut(&mut self.chunks[..]);
        &mut elements[..self.len]
    }

    /// The elements as raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(self.as_mut_slice())
    }

    /// Read view for backend `B`; cannot fail
    pub fn view<B: Backend>(&self) -> Aligned<'_, T, B> {
        Aligned {
            data: self.as_slice(),
            backend: PhantomData,
        }
    }

    /// Write view for backend `B`; cannot fail
    pub fn view_mut<B: Backend>(&mut self) -> AlignedMut<'_, T, B> {
        AlignedMut {
            data: self.as_mut_slice(),
            backend: PhantomData,
        }
    }
}

impl<T: Element> Clone for AlignedBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            chunks: self.chunks.clone(),
            len: self.len,
            element: PhantomData,
        }
    }
}

impl<T: Element> std::fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("element", &T::KIND)
            .field("len", &self.len)
            .finish()
    }
}

fn check_alignment<B: Backend>(address: usize, len: usize) -> Result<()> {
    if len != 0 && address % B::WIDTH_BYTES != 0 {
        return Err(Error::Misaligned {
            address,
            required: B::WIDTH_BYTES,
        });
    }
    Ok(())
}

#[inline(always)]
pub(crate) fn debug_assert_aligned<B: Backend>(p: *const u8) {
    debug_assert!(
        p as usize % B::WIDTH_BYTES == 0,
        "pointer {p:p} is not aligned to {} bytes",
        B::WIDTH_BYTES
    );
}

/// Read-only slice whose start is aligned to `B::WIDTH_BYTES`
pub struct Aligned<'a, T: Element, B: Backend = Active> {
    data: &'a [T],
    backend: PhantomData<B>,
}

impl<'a, T: Element, B: Backend> Aligned<'a, T, B> {
    /// Checks alignment of `data`. Empty slices are always accepted.
    pub fn new(data: &'a [T]) -> Result<Self> {
        check_alignment::<B>(data.as_ptr() as usize, data.len())?;
        Ok(Self {
            data,
            backend: PhantomData,
        })
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the view is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The elements
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Start of the view
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Consecutive views of `chunk` elements, dropping a shorter tail.
    ///
    /// # Panics
    ///
    /// Panics if `chunk` elements do not span a whole number of registers.
    pub fn chunks_exact(&self, chunk: usize) -> impl Iterator<Item = Aligned<'a, T, B>> {
        assert!(
            chunk > 0 && (chunk * T::SIZE) % B::WIDTH_BYTES == 0,
            "chunk of {chunk} elements breaks register alignment"
        );
        self.data.chunks_exact(chunk).map(|data| Aligned {
            data,
            backend: PhantomData,
        })
    }

    /// Elements past the last whole chunk of `chunk` elements.
    ///
    /// # Panics
    ///
    /// Panics if `chunk` is zero.
    pub fn remainder(&self, chunk: usize) -> &'a [T] {
        assert!(chunk > 0, "chunk of 0 elements has no remainder");
        let whole = self.data.len() / chunk * chunk;
        &self.data[whole..]
    }
}

impl<T: Element, B: Backend> Clone for Aligned<'_, T, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Element, B: Backend> Copy for Aligned<'_, T, B> {}

/// Mutable slice whose start is aligned to `B::WIDTH_BYTES`
pub struct AlignedMut<'a, T: Element, B: Backend = Active> {
    data: &'a mut [T],
    backend: PhantomData<B>,
}

impl<'a, T: Element, B: Backend> AlignedMut<'a, T, B> {
    /// Checks alignment of `data`. Empty slices are always accepted.
    pub fn new(data: &'a mut [T]) -> Result<Self> {
        check_alignment::<B>(data.as_ptr() as usize, data.len())?;
        Ok(Self {
            data,
            backend: PhantomData,
        })
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the view is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The elements
    pub fn as_slice(&self) -> &[T] {
        &*self.data
    }

    /// The elements, mutably
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Start of the view
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }

    /// Consecutive mutable views of `chunk` elements, dropping a shorter tail.
    ///
    /// # Panics
    ///
    /// Panics if `chunk` elements do not span a whole number of registers.
    pub fn chunks_exact_mut(&mut self, chunk: usize) -> impl Iterator<Item = AlignedMut<'_, T, B>> {
        assert!(
            chunk > 0 && (chunk * T::SIZE) % B::WIDTH_BYTES == 0,
            "chunk of {chunk} elements breaks register alignment"
        );
        self.data.chunks_exact_mut(chunk).map(|data| AlignedMut {
            data,
            backend: PhantomData,
        })
    }
}

impl<T: Element, const N: usize, B: Backend> Vector<T, N, B> {
    /// Loads the first `N` elements of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` holds fewer than `N` elements.
    #[inline(always)]
    pub fn load(src: Aligned<'_, T, B>) -> Self {
        assert!(src.len() >= N, "load needs {N} elements, view holds {}", src.len());
        // SAFETY: the view is aligned and long enough
        unsafe { Self::load_ptr(src.as_ptr()) }
    }

    /// Loads `N` elements starting at `p`.
    ///
    /// # Safety
    ///
    /// `p` must be aligned to `B::WIDTH_BYTES` and valid for `N` reads.
    #[inline(always)]
    pub unsafe fn load_ptr(p: *const T) -> Self {
        let p = p.cast::<u8>();
        debug_assert_aligned::<B>(p);
        Self::from_regs(|i| unsafe { B::load(p.add(i * B::WIDTH_BYTES)) })
    }

    /// Stores the lanes to the first `N` elements of `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` holds fewer than `N` elements.
    #[inline(always)]
    pub fn store(self, dst: &mut AlignedMut<'_, T, B>) {
        assert!(dst.len() >= N, "store needs {N} elements, view holds {}", dst.len());
        // SAFETY: the view is aligned and long enough
        unsafe { self.store_ptr(dst.as_mut_ptr()) }
    }

    /// Stores the lanes to `N` elements starting at `p`.
    ///
    /// # Safety
    ///
    /// `p` must be aligned to `B::WIDTH_BYTES` and valid for `N` writes.
    #[inline(always)]
    pub unsafe fn store_ptr(self, p: *mut T) {
        let p = p.cast::<u8>();
        debug_assert_aligned::<B>(p);
        for i in 0..Self::VEC_LENGTH {
            B::store(p.add(i * B::WIDTH_BYTES), self.reg(i));
        }
    }
}

/// Loads a vector from an aligned view
#[inline(always)]
pub fn load<T: Element, const N: usize, B: Backend>(src: Aligned<'_, T, B>) -> Vector<T, N, B> {
    Vector::load(src)
}

/// Stores a vector to an aligned view
#[inline(always)]
pub fn store<T: Element, const N: usize, B: Backend>(
    dst: &mut AlignedMut<'_, T, B>,
    v: Vector<T, N, B>,
) {
    v.store(dst)
}
