use std::io::Write;

use net_designer::render::{Renderer, TorchRenderer};
use net_designer::{
    conv_block, ArchitectureBuilder, ConvBlockConfig, DesignError, DesignPlan, FcBlockConfig,
    LayerKind, OutFeatures, PoolConfig, ShapeRecord,
};
use tempfile::NamedTempFile;

#[test]
fn end_to_end() {
    let mut builder = ArchitectureBuilder::new();
    builder.set_channels(3).unwrap();
    builder.set_spatial_size(32, 32).unwrap();

    builder.open_block("features");
    builder
        .add_conv_block(ConvBlockConfig::new(64, [3, 3]).with_padding([1, 1]))
        .unwrap();
    assert_eq!(
        builder.current_shape().unwrap(),
        ShapeRecord::spatial(64, 32.0, 32.0)
    );

    builder.add_pool(PoolConfig::new([2, 2])).unwrap();
    assert_eq!(
        builder.current_shape().unwrap(),
        ShapeRecord::spatial(64, 16.0, 16.0)
    );

    builder.open_block("classifier");
    builder.add_view().unwrap();
    assert_eq!(builder.current_shape().unwrap(), ShapeRecord::features(16384));

    builder.add_fc(10usize).unwrap();

    let design = builder.finalize();
    assert!(design.warnings.is_empty());
    assert_eq!(design.layers.len(), 4);
    assert_eq!(design.blocks.len(), 2);
    assert_eq!(design.blocks[0].name, "features");
    assert_eq!(design.blocks[0].layer_indices, vec![0, 1]);
    assert_eq!(design.blocks[1].name, "classifier");
    assert_eq!(design.blocks[1].layer_indices, vec![2, 3]);
    assert_eq!(
        design.layers[3].kind,
        LayerKind::Fc {
            in_features: 16384,
            out_features: 10,
        }
    );
    assert_eq!(design.layers[3].input, ShapeRecord::features(16384));
    assert_eq!(design.layers[3].output, ShapeRecord::features(10));
}

#[test]
fn history_grows_by_one_per_call() {
    let mut builder = ArchitectureBuilder::new();
    builder.set_channels(1).unwrap();
    builder.set_spatial_size(28, 28).unwrap();
    builder.open_block("features");
    builder
        .add_conv_block(conv_block!(8, kernel_size = 3))
        .unwrap()
        .add_dropout(0.2)
        .unwrap()
        .add_pool(PoolConfig::default())
        .unwrap()
        .add_dropout(0.2)
        .unwrap();
    builder.open_block("head");
    builder
        .add_view()
        .unwrap()
        .add_fc_block(FcBlockConfig::new(OutFeatures::Exact(32)))
        .unwrap()
        .add_fc(OutFeatures::Same)
        .unwrap()
        .add_softmax()
        .unwrap();

    let setters = 2;
    assert_eq!(builder.layers().len(), 8);
    assert_eq!(builder.shapes().len(), builder.layers().len() + setters);
}

#[test]
fn same_size_convolution_never_warns() {
    for size in [5, 7, 28, 32, 33] {
        for kernel in [1, 3, 5, 7] {
            let pad = (kernel - 1) / 2;
            let mut builder = ArchitectureBuilder::with_input(3, size, size).unwrap();
            builder.open_block("features");
            builder
                .add_conv_block(conv_block!(16, kernel_size = kernel, padding = pad, stride = 1))
                .unwrap();
            assert!(builder.warnings().is_empty(), "size {size}, kernel {kernel}");
            let layer = &builder.layers()[0];
            assert!(layer.warning.is_none());
            assert_eq!(
                layer.output,
                ShapeRecord::spatial(16, size as f64, size as f64)
            );
        }
    }
}

#[test]
fn pooling_an_odd_width_warns_but_records_the_layer() {
    let mut builder = ArchitectureBuilder::with_input(8, 7, 8).unwrap();
    builder.open_block("features");
    builder.add_pool(PoolConfig::new([2, 2])).unwrap();

    let design = builder.finalize();
    assert_eq!(design.layers.len(), 1);
    assert_eq!(design.warnings.len(), 1);
    assert_eq!(design.warnings[0].layer_index, 0);
    assert_eq!(design.layers[0].output, ShapeRecord::spatial(8, 3.5, 4.0));
    assert!(design.layers[0].warning.is_some());
}

#[test]
fn fc_block_sentinel_keeps_width() {
    let mut builder = ArchitectureBuilder::with_input(64, 4, 4).unwrap();
    builder.open_block("classifier");
    builder.add_view().unwrap();
    let before = builder.current_shape().unwrap();

    builder
        .add_fc_block(FcBlockConfig::new(OutFeatures::Same))
        .unwrap();
    let design = builder.finalize();
    assert_eq!(design.layers[1].output, before);
    assert_eq!(design.layers[1].output, ShapeRecord::features(1024));
}

#[test]
fn shape_must_be_initialized() {
    let mut only_channels = ArchitectureBuilder::new();
    only_channels.set_channels(3).unwrap();
    only_channels.open_block("features");

    let mut only_size = ArchitectureBuilder::new();
    only_size.set_spatial_size(32, 32).unwrap();
    only_size.open_block("features");

    for builder in [&mut only_channels, &mut only_size] {
        assert!(matches!(
            builder.add_conv_block(conv_block!(8, kernel_size = 3)),
            Err(DesignError::UninitializedShape)
        ));
        assert!(matches!(
            builder.add_pool(PoolConfig::default()),
            Err(DesignError::UninitializedShape)
        ));
        assert!(matches!(
            builder.add_dropout(0.5),
            Err(DesignError::UninitializedShape)
        ));
        assert!(matches!(
            builder.add_view(),
            Err(DesignError::UninitializedShape)
        ));
        assert!(matches!(
            builder.add_fc_block(FcBlockConfig::new(OutFeatures::Same)),
            Err(DesignError::UninitializedShape)
        ));
        assert!(matches!(
            builder.add_fc(10usize),
            Err(DesignError::UninitializedShape)
        ));
        assert!(matches!(
            builder.add_softmax(),
            Err(DesignError::UninitializedShape)
        ));
        assert!(builder.layers().is_empty());
    }
}

#[test]
fn conv_needs_an_open_block() {
    let mut builder = ArchitectureBuilder::with_input(3, 32, 32).unwrap();
    assert!(matches!(
        builder.add_conv_block(conv_block!(64, kernel_size = 3, padding = 1)),
        Err(DesignError::NoOpenBlock)
    ));
    assert!(builder.layers().is_empty());
    assert!(builder.current_block().is_none());
}

#[test]
fn view_on_flat_shape_is_a_kind_error() {
    let mut builder = ArchitectureBuilder::with_input(3, 4, 4).unwrap();
    builder.open_block("classifier");
    builder.add_view().unwrap();
    assert!(matches!(
        builder.add_view(),
        Err(DesignError::ShapeKind { .. })
    ));
    assert_eq!(builder.layers().len(), 1);
}

#[test]
fn duplicate_block_names_are_allowed() {
    let mut builder = ArchitectureBuilder::with_input(3, 8, 8).unwrap();
    builder.open_block("features");
    builder.add_pool(PoolConfig::default()).unwrap();
    builder.open_block("features");
    builder.add_pool(PoolConfig::default()).unwrap();

    let design = builder.finalize();
    assert_eq!(design.blocks.len(), 2);
    assert_eq!(design.blocks[0].name, design.blocks[1].name);
    assert_eq!(design.blocks[0].layer_indices, vec![0]);
    assert_eq!(design.blocks[1].layer_indices, vec![1]);

    let script = TorchRenderer::default().render(&design).unwrap();
    assert!(script.ends_with("model = nn.Sequential():add(features):add(features)\n"));
}

#[test]
fn finalize_is_idempotent() {
    let builder = net_designer::presets::cifar_vgg().unwrap();
    let first = builder.finalize();
    let second = builder.finalize();
    assert_eq!(first, second);

    let (layers, blocks) = second.into_parts();
    assert_eq!(layers, first.layers);
    assert_eq!(blocks, first.blocks);
}

#[test]
fn plan_file_round_trip() {
    let plan_json = r#"{
  "input": { "channels": 3, "width": 32, "height": 32 },
  "steps": [
    { "op": "block", "name": "features" },
    { "op": "conv_block", "out_channels": 64, "kernel_size": [3, 3], "padding": [1, 1] },
    { "op": "pool", "size": [2, 2] },
    { "op": "block", "name": "classifier" },
    { "op": "view" },
    { "op": "fc", "out_features": 10 }
  ]
}"#;
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(plan_json.as_bytes())
        .expect("failed to write temp plan");

    let plan = DesignPlan::load(file.path()).unwrap();
    let design = plan.build().unwrap().finalize();
    assert_eq!(design.layers.len(), 4);
    assert_eq!(design.output(), Some(ShapeRecord::features(10)));
}

#[test]
fn missing_plan_file() {
    assert!(matches!(
        DesignPlan::load("does/not/exist.json"),
        Err(DesignError::Io(_))
    ));
}
