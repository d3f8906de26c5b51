use synapse_core::{io, DType, SynapseError, Tensor};
use synapse_nn::{BertEmbeddings, BertPooler};

fn write_embedding_checkpoint(path: &std::path::Path) -> Result<(), SynapseError> {
    let word = Tensor::randn([6, 4]);
    let position = Tensor::randn([8, 4]);
    let token_type = Tensor::randn([2, 4]);
    let gamma = Tensor::ones([4], DType::F32);
    let beta = Tensor::zeros([4], DType::F32);
    io::save(
        [
            ("bert/embeddings/word_embeddings", &word),
            ("bert/embeddings/position_embeddings", &position),
            ("bert/embeddings/token_type_embeddings", &token_type),
            ("bert/embeddings/LayerNorm/gamma", &gamma),
            ("bert/embeddings/LayerNorm/beta", &beta),
        ],
        path,
    )
}

#[test]
fn embeddings_from_pretrained() -> Result<(), SynapseError> {
    let path = std::env::temp_dir().join("synapse_bert_embeddings.safetensors");
    write_embedding_checkpoint(&path)?;
    let embeddings = BertEmbeddings::from_pretrained(&path, 0.0)?;
    std::fs::remove_file(path)?;

    let input_ids = Tensor::from([[0, 1, 2]]);
    let token_type_ids = Tensor::from([[0, 0, 1]]);
    let y = embeddings.forward(&input_ids, &token_type_ids)?;
    assert_eq!(y.shape(), &[1, 3, 4].into());
    // Unit scale and zero shift leave each position zero mean
    assert_eq!(y.mean(-1), [[[0.0], [0.0], [0.0]]]);
    // No dropout, the forward pass is deterministic
    assert_eq!(embeddings.forward(&input_ids, &token_type_ids)?, y);
    Ok(())
}

#[test]
fn embeddings_missing_tensor() -> Result<(), SynapseError> {
    let path = std::env::temp_dir().join("synapse_bert_incomplete.safetensors");
    let word = Tensor::randn([6, 4]);
    io::save([("bert/embeddings/word_embeddings", &word)], &path)?;
    assert!(BertEmbeddings::from_pretrained(&path, 0.0).is_err());
    std::fs::remove_file(path)?;
    Ok(())
}

#[test]
fn embeddings_new() -> Result<(), SynapseError> {
    let embeddings = BertEmbeddings::new(30, 2, 16, 8, 0.0)?;
    let input_ids = Tensor::from([[4, 7], [1, 2]]);
    let token_type_ids = Tensor::from([[0, 0], [0, 1]]);
    let y = embeddings.forward(&input_ids, &token_type_ids)?;
    assert_eq!(y.shape(), &[2, 2, 8].into());
    // word, position and token type tables plus layer norm scale and shift
    assert_eq!((&embeddings).into_iter().count(), 5);

    // Ids of different shapes fail
    assert!(embeddings
        .forward(&input_ids, &Tensor::from([[0, 0]]))
        .is_err());
    Ok(())
}

#[test]
fn embeddings_default_init() -> Result<(), SynapseError> {
    let embeddings = BertEmbeddings::new(30, 2, 16, 8, 0.0)?;
    // Tables default to glorot uniform, the word table is the first
    // parameter
    let word = (&embeddings).into_iter().next().unwrap();
    assert_eq!(word.shape(), &[30, 8].into());
    let limit = (6.0f32 / (30 + 8) as f32).sqrt();
    let values = word.to_vec::<f32>();
    assert!(values.iter().all(|v| v.abs() <= limit));
    assert!(values.iter().any(|v| v.abs() > limit / 2.0));
    Ok(())
}

#[test]
fn pooler() -> Result<(), SynapseError> {
    let pooler = BertPooler::new(6);
    let x = Tensor::randn([2, 3, 4]);
    let y = pooler.forward(&x)?;
    assert_eq!(y.shape(), &[2, 6].into());
    Ok(())
}

#[test]
fn pooler_from_pretrained() -> Result<(), SynapseError> {
    let path = std::env::temp_dir().join("synapse_bert_pooler.safetensors");
    let kernel = Tensor::eye(2, DType::F32);
    let bias = Tensor::zeros([2], DType::F32);
    io::save(
        [
            ("bert/pooler/dense/kernel", &kernel),
            ("bert/pooler/dense/bias", &bias),
        ],
        &path,
    )?;
    let pooler = BertPooler::from_pretrained(&path)?;
    std::fs::remove_file(path)?;

    // Identity kernel, the pooler is tanh of the first step
    let x = Tensor::from([[[0.5, -0.5], [9.0, 9.0]]]);
    assert_eq!(pooler.forward(&x)?, [[0.46211717, -0.46211717]]);
    Ok(())
}
