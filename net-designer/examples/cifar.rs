use net_designer::render::{Renderer, TorchRenderer};
use net_designer::{conv_block, ArchitectureBuilder, FcBlockConfig, OutFeatures, PoolConfig};

fn main() -> net_designer::Result<()> {
    let mut builder = ArchitectureBuilder::new();
    builder.set_channels(3)?;
    builder.set_spatial_size(32, 32)?;

    // input planes are tracked automatically, non-integer outputs are reported
    builder.open_block("features");
    builder
        .add_conv_block(conv_block!(64, kernel_size = 3, padding = 1))?
        .add_dropout(0.3)?
        .add_conv_block(conv_block!(64, kernel_size = 3, padding = 1))?
        .add_pool(PoolConfig::new([2, 2]))?
        .add_conv_block(conv_block!(128, kernel_size = 3, padding = 1))?
        .add_dropout(0.4)?
        .add_conv_block(conv_block!(128, kernel_size = 3, padding = 1))?
        .add_pool(PoolConfig::new([2, 2]))?;

    builder.open_block("regressor");
    builder
        .add_view()?
        .add_dropout(0.4)?
        .add_fc_block(FcBlockConfig::new(OutFeatures::Same))?
        .add_fc_block(FcBlockConfig::new(OutFeatures::Exact(1024)))?
        .add_fc(10usize)?;

    let design = builder.finalize();
    for warning in &design.warnings {
        eprintln!("{warning}");
    }
    print!("{}", TorchRenderer::default().render(&design)?);
    Ok(())
}
