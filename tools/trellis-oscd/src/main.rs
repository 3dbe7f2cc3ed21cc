//! Trellis OSC gateway daemon
//!
//! Binds a UDP endpoint and bridges inbound OSC control messages onto a
//! device tree: either the built-in demo mixer or a tree loaded from a
//! JSON layout file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;
use trellis_bridge::{BridgeConfig, MuteValueBridge, OscBridge};
use trellis_core::ObjectHandle;
use trellis_device::{DeviceTree, GainActuator, MuteActuator, SwitchActuator};

#[derive(Debug, Parser)]
#[command(
    name = "trellis-oscd",
    about = "OSC gateway for tree-structured device control",
    version
)]
struct Args {
    /// Local address to bind
    #[arg(long, default_value = "0.0.0.0:8000", env = "TRELLIS_BIND")]
    bind: String,

    /// JSON device layout file (defaults to the built-in demo mixer)
    #[arg(long)]
    layout: Option<PathBuf>,
}

/// One object in a JSON device layout
#[derive(Debug, Deserialize)]
struct LayoutNode {
    role: String,
    /// "block" (default), "gain", "mute", or "switch"
    #[serde(default)]
    class: Option<String>,
    /// Position count for switches
    #[serde(default)]
    positions: Option<u16>,
    #[serde(default)]
    children: Vec<LayoutNode>,
}

fn add_layout_node(tree: &DeviceTree, parent: ObjectHandle, node: &LayoutNode) -> Result<()> {
    let handle = match node.class.as_deref().unwrap_or("block") {
        "block" => tree.add_block(parent, &node.role)?,
        "gain" => tree.add(parent, &node.role, Arc::new(GainActuator::new(-120.0, 12.0)))?,
        "mute" => tree.add(parent, &node.role, Arc::new(MuteActuator::new()))?,
        "switch" => tree.add(
            parent,
            &node.role,
            Arc::new(SwitchActuator::new(node.positions.unwrap_or(2))),
        )?,
        other => bail!("unknown class {other:?} for role {:?}", node.role),
    };

    for child in &node.children {
        add_layout_node(tree, handle, child)?;
    }
    Ok(())
}

fn load_layout(path: &PathBuf) -> Result<Arc<DeviceTree>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading layout {}", path.display()))?;
    let nodes: Vec<LayoutNode> =
        serde_json::from_str(&raw).with_context(|| format!("parsing layout {}", path.display()))?;

    let tree = DeviceTree::new();
    for node in &nodes {
        add_layout_node(&tree, tree.root(), node)?;
    }
    Ok(Arc::new(tree))
}

/// A four-channel mixer with per-channel gain and mute
fn demo_tree() -> Result<Arc<DeviceTree>> {
    let tree = DeviceTree::new();
    let mixer = tree.add_block(tree.root(), "Mixer")?;

    let gains = tree.add_block(mixer, "Gain")?;
    let mutes = tree.add_block(mixer, "Mute")?;
    for channel in 1..=4 {
        let role = channel.to_string();
        tree.add(gains, &role, Arc::new(GainActuator::new(-120.0, 12.0)))?;
        tree.add(mutes, &role, Arc::new(MuteActuator::new()))?;
    }

    tree.add(mixer, "Select", Arc::new(SwitchActuator::new(4)))?;
    Ok(Arc::new(tree))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let tree = match &args.layout {
        Some(path) => load_layout(path)?,
        None => demo_tree()?,
    };
    info!(objects = tree.len(), "device tree ready");

    let mut bridge = OscBridge::new(
        BridgeConfig {
            bind_addr: args.bind,
        },
        tree,
    );
    bridge.register_hook(MuteActuator::CLASS_ID, Arc::new(MuteValueBridge));
    bridge.run();

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutting down");
    bridge.stop();

    Ok(())
}
