// crates/se_tracers/src/field.rs

//! 单元主序场
//!
//! 所有示踪剂实体都是以单元为最外层维度的稠密多维数组，存放在后端缓冲区中。
//! 按单元切分即可得到互不重叠的切片，供并行工作线程各自处理。

use std::fmt;

use rayon::prelude::*;
use se_foundation::RowMajor;
use se_runtime::{Backend, DeviceBuffer};

use crate::error::{TracerError, TracerResult};

/// 单元主序稠密场
pub struct ElementField<B: Backend> {
    name: &'static str,
    layout: RowMajor,
    elem_len: usize,
    data: B::Buffer<B::Scalar>,
}

impl<B: Backend> ElementField<B> {
    /// 按各维长度分配零初始化的场
    ///
    /// `extents[0]` 为单元数。总字节数超过地址空间时返回 InvalidArgument。
    pub(crate) fn alloc(backend: &B, name: &'static str, extents: &[usize]) -> TracerResult<Self> {
        let overflow = || {
            TracerError::invalid_argument("init", format!("场 '{}' 的尺寸 {:?} 超出可寻址范围", name, extents))
        };
        let layout = RowMajor::new(extents).ok_or_else(overflow)?;
        let bytes = layout
            .len()
            .checked_mul(std::mem::size_of::<B::Scalar>())
            .ok_or_else(overflow)?;
        if bytes > isize::MAX as usize {
            return Err(overflow());
        }

        let elem_len = extents[1..].iter().product();
        Ok(Self {
            name,
            elem_len,
            data: backend.alloc(layout.len()),
            layout,
        })
    }

    /// 场名称
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 各维长度（含单元维）
    #[inline]
    pub fn extents(&self) -> &[usize] {
        self.layout.extents()
    }

    /// 第 `dim` 维长度
    #[inline]
    pub fn extent(&self, dim: usize) -> usize {
        self.layout.extents()[dim]
    }

    /// 单元数
    #[inline]
    pub fn num_elems(&self) -> usize {
        self.extent(0)
    }

    /// 每个单元的值个数
    #[inline]
    pub fn elem_len(&self) -> usize {
        self.elem_len
    }

    /// 值总数
    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    /// 是否为空（某个示踪剂维为 0 时成立）
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// 多维索引 -> 扁平偏移
    #[inline]
    pub fn offset(&self, index: &[usize]) -> usize {
        self.layout.offset(index)
    }

    /// 读取单个值
    #[inline]
    pub fn get(&self, index: &[usize]) -> B::Scalar {
        self.data.as_slice()[self.offset(index)]
    }

    /// 写入单个值
    #[inline]
    pub fn set(&mut self, index: &[usize], value: B::Scalar) {
        let off = self.offset(index);
        self.data.as_slice_mut()[off] = value;
    }

    /// 单元 `ie` 的只读切片
    #[inline]
    pub fn element(&self, ie: usize) -> &[B::Scalar] {
        let start = ie * self.elem_len;
        &self.data.as_slice()[start..start + self.elem_len]
    }

    /// 单元 `ie` 的可变切片
    #[inline]
    pub fn element_mut(&mut self, ie: usize) -> &mut [B::Scalar] {
        let start = ie * self.elem_len;
        &mut self.data.as_slice_mut()[start..start + self.elem_len]
    }

    /// 全部数据
    #[inline]
    pub fn as_slice(&self) -> &[B::Scalar] {
        self.data.as_slice()
    }

    /// 全部数据（可变）
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [B::Scalar] {
        self.data.as_slice_mut()
    }

    /// 底层缓冲区
    #[inline]
    pub fn buffer(&self) -> &B::Buffer<B::Scalar> {
        &self.data
    }

    /// 底层缓冲区（可变）
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut B::Buffer<B::Scalar> {
        &mut self.data
    }

    /// 按单元并行处理，每个工作线程只拿到自己单元的切片
    pub fn par_for_each_element_mut<F>(&mut self, f: F)
    where
        F: Fn(usize, &mut [B::Scalar]) + Send + Sync,
    {
        if self.elem_len == 0 {
            return;
        }
        let elem_len = self.elem_len;
        self.data
            .as_slice_mut()
            .par_chunks_mut(elem_len)
            .enumerate()
            .for_each(|(ie, chunk)| f(ie, chunk));
    }

    /// 占用字节数
    #[inline]
    pub fn memory_bytes(&self) -> usize {
        self.len() * std::mem::size_of::<B::Scalar>()
    }
}

impl<B: Backend> fmt::Debug for ElementField<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementField")
            .field("name", &self.name)
            .field("extents", &self.layout.extents())
            .finish()
    }
}
