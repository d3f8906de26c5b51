use synapse_core::{io, DType, SynapseError, Tensor};

#[test]
fn save_load() -> Result<(), SynapseError> {
    let path = std::env::temp_dir().join("synapse_io_save_load.safetensors");
    let w = Tensor::from([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    let b = Tensor::from([1, 2]);
    io::save([("weight", &w), ("bias", &b)], &path)?;

    let tensors = io::load(&path)?;
    assert_eq!(tensors.len(), 2);
    let (name, loaded) = &tensors[0];
    assert_eq!(name, "weight");
    assert_eq!(loaded.dtype(), DType::F32);
    assert_eq!(loaded, &w);
    let (name, loaded) = &tensors[1];
    assert_eq!(name, "bias");
    assert_eq!(loaded.dtype(), DType::I32);
    assert_eq!(loaded, &b);

    std::fs::remove_file(path)?;
    Ok(())
}

#[test]
fn missing_file() {
    let path = std::env::temp_dir().join("synapse_io_does_not_exist.safetensors");
    assert!(io::load(path).is_err());
}

fn write_with_header(path: &std::path::Path, header: &str) -> Result<(), SynapseError> {
    let mut bytes = (header.len() as u64).to_le_bytes().to_vec();
    bytes.extend(header.as_bytes());
    bytes.extend([0u8; 4]);
    std::fs::write(path, bytes)?;
    Ok(())
}

#[test]
fn bad_offsets() -> Result<(), SynapseError> {
    // Reversed offsets must not panic
    let path = std::env::temp_dir().join("synapse_io_reversed_offsets.safetensors");
    write_with_header(
        &path,
        "{\"x\":{\"dtype\":\"F32\",\"shape\":[1],\"data_offsets\":[8,4]}}",
    )?;
    assert!(io::load(&path).is_err());
    std::fs::remove_file(&path)?;

    // Offsets not matching the shape are rejected
    write_with_header(
        &path,
        "{\"x\":{\"dtype\":\"F32\",\"shape\":[1],\"data_offsets\":[0,8]}}",
    )?;
    assert!(io::load(&path).is_err());
    std::fs::remove_file(path)?;
    Ok(())
}

#[test]
fn garbage_header() -> Result<(), SynapseError> {
    let path = std::env::temp_dir().join("synapse_io_garbage.safetensors");
    let mut bytes = 4u64.to_le_bytes().to_vec();
    bytes.extend([0xff; 4]);
    std::fs::write(&path, bytes)?;
    assert!(io::load(&path).is_err());
    std::fs::remove_file(path)?;
    Ok(())
}
