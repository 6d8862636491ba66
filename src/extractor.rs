//! Typed column access over a loaded element's row buffer, plus the
//! header-time list-to-fixed-size rewrite that lets repeatedly-triangle
//! meshes skip list bookkeeping entirely.

use crate::error::PlyError;
use crate::header::{ElementDescriptor, PropertyDescriptor};
use crate::scalar::ScalarType;

impl ElementDescriptor {
    pub fn has_property(&self, name: &[u8]) -> bool {
        self.find_property(name).is_some()
    }

    /// Whether every name in `names` resolves to a non-list property.
    pub fn has_scalar_tuple(&self, names: &[&[u8]]) -> bool {
        names.iter().all(|name| {
            self.find_property(name)
                .is_some_and(|i| !self.properties[i].is_list())
        })
    }

    /// Extract `names.len()` scalar columns as `f32`, one row at a time,
    /// into `dst[row * names.len() + col]`. Returns `false` if any name is
    /// missing, refers to a list property, or `dst` is the wrong length —
    /// these are expected caller-schema mismatches, not I/O errors.
    ///
    /// Four cases are distinguished, in increasing order of cost:
    /// - all requested columns are contiguous `f32` and are the element's
    ///   only properties: one pass copying the whole buffer;
    /// - contiguous `f32` among other properties: one stride-sized copy per
    ///   row;
    /// - non-contiguous `f32`: one four-byte copy per column per row;
    /// - any other type mix: per-field numeric conversion.
    pub fn extract_scalar_tuple(&self, names: &[&[u8]], element_data: &[u8], dst: &mut [f32]) -> bool {
        let k = names.len();
        if k == 0 || dst.len() != self.count * k {
            return false;
        }

        let mut idx = Vec::with_capacity(k);
        for name in names {
            match self.find_property(name) {
                Some(i) if !self.properties[i].is_list() => idx.push(i),
                _ => return false,
            }
        }

        let offsets: Vec<usize> = idx.iter().map(|&i| self.properties[i].offset).collect();
        let all_f32 = idx.iter().all(|&i| self.properties[i].value_type == ScalarType::F32);
        let contiguous = (1..k).all(|j| offsets[j] == offsets[j - 1] + 4);

        if all_f32 && contiguous && self.properties.len() == k && offsets[0] == 0 {
            for row in 0..self.count {
                let src = row * self.row_stride;
                read_f32_run(&element_data[src..src + k * 4], &mut dst[row * k..row * k + k]);
            }
            return true;
        }

        if all_f32 && contiguous {
            for row in 0..self.count {
                let src = row * self.row_stride + offsets[0];
                read_f32_run(&element_data[src..src + k * 4], &mut dst[row * k..row * k + k]);
            }
            return true;
        }

        if all_f32 {
            for row in 0..self.count {
                for (j, &off) in offsets.iter().enumerate() {
                    let o = row * self.row_stride + off;
                    dst[row * k + j] = f32::from_le_bytes(element_data[o..o + 4].try_into().unwrap());
                }
            }
            return true;
        }

        for row in 0..self.count {
            for (j, &i) in idx.iter().enumerate() {
                let prop = &self.properties[i];
                let o = row * self.row_stride + offsets[j];
                let bytes = &element_data[o..o + prop.value_type.size()];
                dst[row * k + j] = scalar_to_f32(bytes, prop.value_type);
            }
        }
        true
    }

    /// Extract a list property's flattened rows into `dst`, converting each
    /// item from its on-disk scalar type via `T::from_scalar`. Returns
    /// `false` if `prop_index` is out of range, not a list, or `dst`'s
    /// length doesn't match the total item count across all rows.
    pub fn extract_list_as<T: FromPlyScalar>(&self, prop_index: usize, dst: &mut [T]) -> bool {
        let Some(prop) = self.properties.get(prop_index) else {
            return false;
        };
        if !prop.is_list() {
            return false;
        }
        let total: usize = prop.row_count.iter().map(|&c| c as usize).sum();
        if dst.len() != total {
            return false;
        }
        let item_size = prop.value_type.size();
        let mut out_i = 0;
        for (row, &start) in prop.row_start.iter().enumerate() {
            let cnt = prop.row_count[row] as usize;
            for j in 0..cnt {
                let o = start + j * item_size;
                dst[out_i] = T::from_scalar(&prop.list_data[o..o + item_size], prop.value_type);
                out_i += 1;
            }
        }
        true
    }

    pub fn list_row_counts(&self, prop_index: usize) -> Option<&[u32]> {
        self.properties
            .get(prop_index)
            .filter(|p| p.is_list())
            .map(|p| p.row_count.as_slice())
    }

    pub fn sum_of_list_counts(&self, prop_index: usize) -> Option<u64> {
        self.list_row_counts(prop_index)
            .map(|counts| counts.iter().map(|&c| c as u64).sum())
    }

    /// Sum of `max(0, count - 2)` across every row: the number of triangles
    /// a fan triangulation of each polygon row would produce.
    pub fn count_triangles(&self, prop_index: usize) -> Option<u64> {
        self.list_row_counts(prop_index)
            .map(|counts| counts.iter().map(|&c| c.saturating_sub(2) as u64).sum())
    }

    pub fn all_rows_have_n(&self, prop_index: usize, n: u32) -> bool {
        match self.list_row_counts(prop_index) {
            Some(counts) => counts.iter().all(|&c| c == n),
            None => false,
        }
    }

    /// Splice list property `prop_index` (which must not yet have been
    /// loaded) into a `<name>_count` scalar column followed by `n`
    /// `<name>_0 .. <name>_{n-1}` scalar columns of its value type, and
    /// recompute the element's layout. Returns the indices of the `n` new
    /// value columns, in order.
    ///
    /// Meant for meshes known in advance to be all-triangle or all-quad: it
    /// turns list-property bookkeeping (`row_start`/`row_count` bookkeeping,
    /// per-row list reads) into plain fixed-row scalar columns.
    pub fn convert_list_to_fixed_size(&mut self, prop_index: usize, n: usize) -> Result<Vec<usize>, PlyError> {
        let prop = self
            .properties
            .get(prop_index)
            .ok_or_else(|| PlyError::MissingProperty(format!("index {prop_index}")))?;
        if !prop.is_list() {
            return Err(PlyError::UnexpectedScalarProperty(
                String::from_utf8_lossy(&prop.name).into_owned(),
            ));
        }
        let count_type = prop.count_type.unwrap();
        let value_type = prop.value_type;
        let base_name = prop.name.clone();

        let mut new_properties = Vec::with_capacity(self.properties.len() + n);
        let mut new_indices = Vec::with_capacity(n);
        for (i, existing) in self.properties.iter().enumerate() {
            if i != prop_index {
                new_properties.push(existing.clone());
                continue;
            }
            let mut count_name = base_name.clone();
            count_name.extend_from_slice(b"_count");
            new_properties.push(PropertyDescriptor::new_scalar(count_name, count_type));
            for k in 0..n {
                let mut value_name = base_name.clone();
                value_name.extend_from_slice(format!("_{k}").as_bytes());
                new_indices.push(new_properties.len());
                new_properties.push(PropertyDescriptor::new_scalar(value_name, value_type));
            }
        }

        self.properties = new_properties;
        self.recompute_layout();
        Ok(new_indices)
    }

    /// Triangulate every row of list property `prop_index` (the face's
    /// vertex-index list) against `vert_pos`/`num_verts`, appending the
    /// resulting triangle indices to `dst`. Returns the total triangle
    /// count. Rows with invalid vertex indices contribute zero triangles
    /// rather than failing the whole element.
    pub fn extract_triangles(
        &self,
        prop_index: usize,
        vert_pos: &[f32],
        num_verts: u32,
        dst: &mut Vec<i32>,
    ) -> Option<u32> {
        let prop = self.properties.get(prop_index).filter(|p| p.is_list())?;
        let item_size = prop.value_type.size();

        let mut scratch = Vec::new();
        let mut total = 0u32;
        for (row, &start) in prop.row_start.iter().enumerate() {
            let n = prop.row_count[row] as usize;
            scratch.clear();
            for j in 0..n {
                let o = start + j * item_size;
                let v = scalar_to_i64(&prop.list_data[o..o + item_size], prop.value_type);
                scratch.push(v as i32);
            }
            let before = dst.len();
            dst.resize(before + n.saturating_sub(2) * 3, 0);
            let tris = crate::triangulate::triangulate_polygon(
                n,
                vert_pos,
                num_verts,
                &scratch,
                &mut dst[before..],
            );
            dst.truncate(before + tris * 3);
            total += tris as u32;
        }
        Some(total)
    }
}

fn read_f32_run(bytes: &[u8], dst: &mut [f32]) {
    for (chunk, out) in bytes.chunks_exact(4).zip(dst.iter_mut()) {
        *out = f32::from_le_bytes(chunk.try_into().unwrap());
    }
}

fn scalar_to_i64(bytes: &[u8], ty: ScalarType) -> i64 {
    match ty {
        ScalarType::I8 => bytes[0] as i8 as i64,
        ScalarType::U8 => bytes[0] as i64,
        ScalarType::I16 => i16::from_le_bytes([bytes[0], bytes[1]]) as i64,
        ScalarType::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as i64,
        ScalarType::I32 => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64,
        ScalarType::U32 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64,
        ScalarType::F32 => f32::from_le_bytes(bytes.try_into().unwrap()) as i64,
        ScalarType::F64 => f64::from_le_bytes(bytes.try_into().unwrap()) as i64,
    }
}

fn scalar_to_f32(bytes: &[u8], ty: ScalarType) -> f32 {
    match ty {
        ScalarType::F32 => f32::from_le_bytes(bytes.try_into().unwrap()),
        ScalarType::F64 => f64::from_le_bytes(bytes.try_into().unwrap()) as f32,
        other => scalar_to_i64(bytes, other) as f32,
    }
}

/// Widening/narrowing conversion from an on-disk scalar's raw bytes into a
/// requested in-memory numeric type. Float-to-integer conversions truncate
/// toward zero, matching `as` cast semantics.
pub trait FromPlyScalar: Copy {
    fn from_scalar(bytes: &[u8], ty: ScalarType) -> Self;
}

macro_rules! impl_from_ply_scalar_int {
    ($t:ty) => {
        impl FromPlyScalar for $t {
            fn from_scalar(bytes: &[u8], ty: ScalarType) -> Self {
                scalar_to_i64(bytes, ty) as $t
            }
        }
    };
}

impl_from_ply_scalar_int!(i8);
impl_from_ply_scalar_int!(u8);
impl_from_ply_scalar_int!(i16);
impl_from_ply_scalar_int!(u16);
impl_from_ply_scalar_int!(i32);
impl_from_ply_scalar_int!(u32);
impl_from_ply_scalar_int!(i64);
impl_from_ply_scalar_int!(u64);

impl FromPlyScalar for f32 {
    fn from_scalar(bytes: &[u8], ty: ScalarType) -> Self {
        scalar_to_f32(bytes, ty)
    }
}

impl FromPlyScalar for f64 {
    fn from_scalar(bytes: &[u8], ty: ScalarType) -> Self {
        match ty {
            ScalarType::F64 => f64::from_le_bytes(bytes.try_into().unwrap()),
            other => scalar_to_f32(bytes, other) as f64,
        }
    }
}
