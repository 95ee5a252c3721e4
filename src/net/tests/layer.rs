use crate::net::{
    Layer, LayerParams, NetParameter, NetStateRule, ParamSpec, Phase, ScaleParam,
};
use crate::proto::{TextMessage, parse};

fn layer_from(text: &str) -> Layer {
    Layer::from_message(parse(text).unwrap()).unwrap()
}

#[test]
fn test_layer_typed_fields() {
    let conv = layer_from(
        r#"
        name: "conv1" type: "Convolution" bottom: "data" top: "conv1"
        param { lr_mult: 1 decay_mult: 1 }
        convolution_param { num_output: 64 bias_term: false kernel_size: 7 stride: 2 }
        "#,
    );
    assert_eq!(conv.bottom, vec!["data"]);
    assert_eq!(conv.param, vec![ParamSpec::new(1.0, 1.0)]);
    assert_eq!(conv.num_output(), Some(64));
    assert!(!conv.params.has_bias());
    // 未建模的字段仍留在参数块里
    match &conv.params {
        LayerParams::Convolution(p) => assert_eq!(p.rest.get_i64("stride").unwrap(), Some(2)),
        other => panic!("期望Convolution参数块，实际得到{other:?}"),
    }
    assert!(conv.extra.is_empty());

    let bn = layer_from(
        r#"name: "bn1" type: "BatchNorm" batch_norm_param { use_global_stats: true }"#,
    );
    assert_eq!(bn.use_global_stats(), Some(true));

    let relu = layer_from(r#"name: "relu1" type: "ReLU" relu_param { negative_slope: 0.1 }"#);
    assert_eq!(relu.params, LayerParams::Opaque);
    assert!(relu.extra.get_message("relu_param").is_some());
}

#[test]
fn test_bias_defaults() {
    assert!(LayerParams::for_type("Convolution").has_bias());
    assert!(LayerParams::for_type("InnerProduct").has_bias());
    assert!(!LayerParams::for_type("Scale").has_bias());
    assert!(!LayerParams::for_type("BatchNorm").has_bias());

    let scale = Layer::new("scale1", "Scale").with_params(LayerParams::Scale(ScaleParam {
        bias_term: Some(true),
        ..ScaleParam::default()
    }));
    assert!(scale.params.has_bias());
}

#[test]
fn test_layer_print_order() {
    let mut data_param = TextMessage::new();
    data_param.push("source", "train_lmdb");
    data_param.push("batch_size", 32u32);

    let layer = Layer::new("data1", "Data")
        .top("data")
        .top("label")
        .include(NetStateRule::phase(Phase::Train).with_stage("test-on-train"))
        .extra_message("data_param", data_param)
        .unwrap();
    let net = NetParameter {
        layer: vec![layer],
        ..NetParameter::new("n")
    };

    let expected = "\
name: \"n\"
layer {
  name: \"data1\"
  type: \"Data\"
  top: \"data\"
  top: \"label\"
  include {
    phase: TRAIN
    stage: \"test-on-train\"
  }
  data_param {
    source: \"train_lmdb\"
    batch_size: 32
  }
}
";
    assert_eq!(net.to_text(), expected);
}

#[test]
fn test_set_num_output() {
    let mut fc = Layer::new("fc", "InnerProduct");
    assert!(fc.set_num_output(3));
    assert_eq!(fc.num_output(), Some(3));

    // 非全连接层：写入extra中的inner_product_param块
    let mut pool = layer_from(r#"name: "pool" type: "Pooling" inner_product_param { num_output: 5 }"#);
    assert!(!pool.set_num_output(7));
    assert_eq!(pool.num_output(), Some(7));
    assert_eq!(pool.extra.get_all("inner_product_param").count(), 1);

    let mut relu = Layer::new("relu", "ReLU");
    assert!(!relu.set_num_output(2));
    assert!(relu.to_message().get_message("inner_product_param").is_some());
}

#[test]
fn test_use_global_stats_only_for_batch_norm() {
    let mut bn = Layer::new("bn", "BatchNorm");
    assert_eq!(bn.use_global_stats(), None);
    assert!(bn.set_use_global_stats(false));
    assert_eq!(bn.use_global_stats(), Some(false));

    let mut scale = Layer::new("scale", "Scale");
    assert!(!scale.set_use_global_stats(true));
    assert_eq!(scale.use_global_stats(), None);
}

#[test]
fn test_primary_output_and_dedup() {
    let mut layer = Layer::new("fc", "InnerProduct").top("a").top("b").top("a");
    layer.dedup_tops();
    assert_eq!(layer.top, vec!["a", "b"]);
    assert_eq!(layer.primary_output(), "a");
    assert_eq!(Layer::new("prob", "Softmax").primary_output(), "prob");
}

#[test]
fn test_param_spec() {
    let spec = ParamSpec::from_message(parse(r#"name: "w" lr_mult: 0 share_mode: STRICT"#).unwrap()).unwrap();
    assert_eq!(spec.name.as_deref(), Some("w"));
    assert_eq!(spec.lr_mult, Some(0.0));
    assert_eq!(spec.decay_mult, None);
    assert!(spec.is_frozen());
    assert!(!ParamSpec::default().is_frozen());
    assert!(ParamSpec::lr_only(0.0).is_frozen());

    let msg = spec.to_message();
    let printed: Vec<&str> = msg.iter().map(|(n, _)| n).collect();
    assert_eq!(printed, vec!["name", "share_mode", "lr_mult"]);
}

#[test]
fn test_state_rule() {
    let rule = NetStateRule::from_message(parse(r#"phase: TEST stage: "a" stage: "b""#).unwrap()).unwrap();
    assert_eq!(rule.phase, Some(Phase::Test));
    assert_eq!(rule.to_string(), "TEST(a,b)");

    let numeric = NetStateRule::from_message(parse("phase: 0").unwrap()).unwrap();
    assert_eq!(numeric.phase, Some(Phase::Train));
    assert_eq!(NetStateRule::default().to_string(), "*");

    assert!(NetStateRule::from_message(parse("phase: VALIDATE").unwrap()).is_err());
}

#[test]
fn test_builder_param_block_goes_to_typed_params() {
    let mut block = TextMessage::new();
    block.push("num_output", 3u32);
    block.push("bias_term", false);
    let mut fc = Layer::new("fc", "InnerProduct")
        .extra_message("inner_product_param", block)
        .unwrap();
    assert!(fc.extra.is_empty());
    assert_eq!(fc.num_output(), Some(3));
    assert!(!fc.params.has_bias());
    assert!(fc.set_num_output(5));
    assert_eq!(fc.to_message().get_all("inner_product_param").count(), 1);

    let mut bn_block = TextMessage::new();
    bn_block.push("use_global_stats", true);
    let bn = Layer::new("bn", "BatchNorm")
        .extra_message("batch_norm_param", bn_block)
        .unwrap();
    assert_eq!(bn.use_global_stats(), Some(true));

    // 与其它类型的参数块无关的字段照旧放进extra
    let relu = Layer::new("relu", "ReLU")
        .extra_field("engine", crate::proto::Scalar::Ident("CUDNN".to_string()))
        .unwrap();
    assert!(relu.extra.contains("engine"));
}

#[test]
fn test_builder_rejects_malformed_param_block() {
    let mut block = TextMessage::new();
    block.push("num_output", "many");
    assert!(
        Layer::new("fc", "InnerProduct")
            .extra_message("inner_product_param", block)
            .is_err()
    );
    assert!(Layer::new("conv", "Convolution").extra_field("convolution_param", 3u32).is_err());
}
