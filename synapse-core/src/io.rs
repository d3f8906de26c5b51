//! Tensor serialization in the safetensors format,
//! with tensor names preserved in the header.

use crate::dtype::DType;
use crate::error::SynapseError;
use crate::shape::Shape;
use crate::tensor::Tensor;
use core::fmt::Write as CoreFmtWrite;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// This trait is implemented automatically for all modules that implement
/// IntoIterator<Item = &mut Tensor>
pub trait ModuleIO {
    /// Save self into path
    fn save(self, path: impl AsRef<Path>) -> Result<(), SynapseError>;
    /// Load self from path
    fn load(self, path: impl AsRef<Path>) -> Result<(), SynapseError>;
}

impl<'a, Tensors: IntoIterator<Item = &'a mut Tensor>> ModuleIO for Tensors {
    fn save(self, path: impl AsRef<Path>) -> Result<(), SynapseError> {
        let tensors: Vec<&Tensor> = self.into_iter().map(|x| &*x).collect();
        let names: Vec<String> = (0..tensors.len()).map(|i| i.to_string()).collect();
        save(names.iter().map(String::as_str).zip(tensors), path)
    }

    fn load(self, path: impl AsRef<Path>) -> Result<(), SynapseError> {
        let targets: Vec<&mut Tensor> = self.into_iter().collect();
        let tensors = load(path)?;
        for (x, (_, y)) in targets.into_iter().zip(tensors) {
            *x = y;
        }
        Ok(())
    }
}

/// Save all named tensors into file.
/// # Errors
/// Returns io error if there was problem writing file to filesystem.
pub fn save<'a>(
    tensors: impl IntoIterator<Item = (&'a str, &'a Tensor)>,
    path: impl AsRef<Path>,
) -> Result<(), SynapseError> {
    let mut f = File::create(path)?;
    let mut header = String::from("{");
    let mut begin = 0;
    let tensors: Vec<(&str, &Tensor)> = tensors.into_iter().collect();
    for (name, tensor) in &tensors {
        let dtype = tensor.dtype();
        write!(header, "\"{name}\":{{").unwrap();
        write!(header, "\"dtype\":\"{}\",", dtype.safetensors()).unwrap();
        write!(header, "\"shape\":{},", tensor.shape().safetensors()).unwrap();
        let size = tensor.numel() * dtype.byte_size();
        write!(header, "\"data_offsets\":[{},{}]", begin, begin + size).unwrap();
        begin += size;
        write!(header, "}},").unwrap();
    }
    header.pop();
    write!(header, "}}").unwrap();
    let header_bytes = header.as_bytes();
    f.write_all(&(header_bytes.len() as u64).to_le_bytes())?;
    f.write_all(header_bytes)?;
    for (_, tensor) in tensors {
        match tensor.dtype() {
            DType::F32 => {
                let vec = tensor.to_vec::<f32>();
                let mut bytes: Vec<u8> = Vec::with_capacity(vec.len() * 4);
                for x in vec {
                    bytes.extend(x.to_le_bytes());
                }
                f.write_all(&bytes)?;
            }
            DType::I32 => {
                let vec = tensor.to_vec::<i32>();
                let mut bytes: Vec<u8> = Vec::with_capacity(vec.len() * 4);
                for x in vec {
                    bytes.extend(x.to_le_bytes());
                }
                f.write_all(&bytes)?;
            }
        };
    }
    Ok(())
}

/// Load all named tensors from file, in file order.
/// # Errors
/// Returns io error if there was io error or parsing error.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<(String, Tensor)>, SynapseError> {
    let mut f = File::open(path)?;
    let mut header_len = [0u8; 8];
    f.read_exact(&mut header_len)?;
    let header_len = usize::try_from(u64::from_le_bytes(header_len))
        .map_err(|err| SynapseError::ParseError(format!("Invalid safetensors header: {err}")))?;
    let mut header = vec![0u8; header_len];
    f.read_exact(&mut header)?;
    let header = core::str::from_utf8(&header)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    let mut text = String::with_capacity(10);
    let mut begin_str = false;
    let mut i = 0;
    let mut tensors = Vec::new();
    let mut name = String::new();
    let mut dtype = DType::F32;
    let mut shape: Shape = [1].into();
    for x in header.chars() {
        if ['"', '[', ']'].contains(&x) {
            if begin_str {
                if i % 7 == 0 {
                    name = text.clone();
                } else if i % 7 == 2 {
                    dtype = DType::from_safetensors(&text)?;
                } else if i % 7 == 4 {
                    shape = Shape::from_safetensors(&text)?;
                } else if i % 7 == 6 {
                    let offsets = text
                        .split(',')
                        .map(|offset| {
                            offset.parse::<usize>().map_err(|err| {
                                SynapseError::ParseError(format!(
                                    "Could not parse safetensors offset: {err}"
                                ))
                            })
                        })
                        .collect::<Result<Vec<usize>, SynapseError>>()?;
                    let size = shape.numel() * dtype.byte_size();
                    if offsets.len() != 2 || offsets[1].checked_sub(offsets[0]) != Some(size) {
                        return Err(SynapseError::ParseError(
                            "Safetensors shapes and offsets are incorrect.".into(),
                        ));
                    }
                    let mut buf = vec![0u8; size];
                    f.read_exact(&mut buf)?;
                    tensors.push((
                        core::mem::take(&mut name),
                        match dtype {
                            DType::F32 => {
                                let vec: Vec<f32> = buf
                                    .chunks_exact(dtype.byte_size())
                                    .map(|x| f32::from_le_bytes([x[0], x[1], x[2], x[3]]))
                                    .collect();
                                Tensor::from_vec(vec, &shape)?
                            }
                            DType::I32 => {
                                let vec: Vec<i32> = buf
                                    .chunks_exact(dtype.byte_size())
                                    .map(|x| i32::from_le_bytes([x[0], x[1], x[2], x[3]]))
                                    .collect();
                                Tensor::from_vec(vec, &shape)?
                            }
                        },
                    ));
                }
                i += 1;
                text.clear();
                begin_str = false;
            } else {
                text.clear();
                begin_str = true;
            }
        } else {
            text.push(x);
        }
    }
    Ok(tensors)
}
