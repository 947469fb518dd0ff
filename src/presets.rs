//! Ready-made force configurations for org-network diagrams.
//!
//! Each preset is plain data: an ordered list of named forces built from
//! [`LayoutOptions`]. Variants start from [`base`] and replace or add
//! forces by name, so replaced forces keep their place in evaluation order.

use crate::config::LayoutOptions;
use crate::force::{
    CenterForce, ClusterForce, CollideForce, Force, LinkForce, LinkParam, ManyBodyForce,
    NodeParam, PositionForce,
};

/// Named forces in evaluation order.
pub type ForceSet = Vec<(&'static str, Box<dyn Force>)>;

/// Strength of the weak x/y pulls toward the middle of the viewport.
pub const AXIS_STRENGTH: f64 = 0.05;

/// Horizontal distance between team columns in [`levelled_columns`].
pub const COLUMN_SPACING: f64 = 150.0;

/// Preset names accepted by [`by_name`].
pub const NAMES: [&str; 6] = [
    "base",
    "clustered",
    "edgeWeighted",
    "hubCentric",
    "levelled",
    "relaxed",
];

/// Insert or replace `name`, keeping the original slot on replacement.
fn set(forces: &mut ForceSet, name: &'static str, force: Box<dyn Force>) {
    match forces.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = force,
        None => forces.push((name, force)),
    }
}

fn axis_pulls(forces: &mut ForceSet, options: &LayoutOptions, strength: impl Into<NodeParam>) {
    let (cx, cy) = options.dimensions().center();
    let strength = strength.into();
    set(forces, "x", Box::new(PositionForce::x(cx).strength(strength.clone())));
    set(forces, "y", Box::new(PositionForce::y(cy).strength(strength)));
}

/// Link (strength 0.7), charge, center at the viewport middle and
/// collision at 1.5× the node radius.
pub fn base(options: &LayoutOptions) -> ForceSet {
    let (cx, cy) = options.dimensions().center();
    let mut forces = ForceSet::new();
    set(
        &mut forces,
        "link",
        Box::new(LinkForce::new().distance(options.link_distance).strength(0.7)),
    );
    set(
        &mut forces,
        "charge",
        Box::new(ManyBodyForce::new().strength(options.charge_strength)),
    );
    set(&mut forces, "center", Box::new(CenterForce::new(cx, cy)));
    set(
        &mut forces,
        "collision",
        Box::new(CollideForce::new(options.node_radius * 1.5)),
    );
    forces
}

/// Weight-scaled links, weak axis pulls and team clustering.
pub fn clustered(options: &LayoutOptions, cluster_strength: f64) -> ForceSet {
    let d = options.link_distance;
    let mut forces = base(options);
    set(
        &mut forces,
        "link",
        Box::new(
            LinkForce::new()
                .distance(LinkParam::from_fn(move |link| d * (1.0 + link.weight())))
                .strength(LinkParam::weight()),
        ),
    );
    axis_pulls(&mut forces, options, AXIS_STRENGTH);
    set(
        &mut forces,
        "cluster",
        Box::new(ClusterForce::new("team", cluster_strength)),
    );
    forces
}

/// Heavier links are shorter and stiffer, with a non-linear strength curve.
pub fn edge_weighted(options: &LayoutOptions) -> ForceSet {
    let d = options.link_distance;
    let mut forces = base(options);
    set(
        &mut forces,
        "link",
        Box::new(
            LinkForce::new()
                .distance(LinkParam::from_fn(move |link| {
                    (d * (2.5 - 2.0 * link.weight())).max(0.0)
                }))
                .strength(LinkParam::from_fn(|link| link.weight().max(0.0).powf(0.7))),
        ),
    );
    axis_pulls(&mut forces, options, AXIS_STRENGTH);
    forces
}

/// Nodes whose `group_key` equals `hub` repel harder, take more room and
/// are held near the middle; everyone else spreads around them.
pub fn hub_centric(options: &LayoutOptions, group_key: &str, hub: &str) -> ForceSet {
    let mut forces = base(options);
    set(
        &mut forces,
        "charge",
        Box::new(ManyBodyForce::new().strength(NodeParam::by_group(group_key, hub, -1000.0, -400.0))),
    );
    set(
        &mut forces,
        "collision",
        Box::new(CollideForce::new(NodeParam::by_group(group_key, hub, 40.0, 20.0)).strength(0.8)),
    );
    axis_pulls(
        &mut forces,
        options,
        NodeParam::by_group(group_key, hub, 0.3, AXIS_STRENGTH),
    );
    forces
}

/// Rows by a numeric `level` attribute (100 units apart), for reporting
/// hierarchies.
pub fn levelled(options: &LayoutOptions, level_key: &str) -> ForceSet {
    let mut forces = base(options);
    set(
        &mut forces,
        "y",
        Box::new(PositionForce::y(NodeParam::attribute(level_key, 0.0).scaled(100.0)).strength(0.5)),
    );
    set(
        &mut forces,
        "collision",
        Box::new(CollideForce::new(options.node_radius * 1.5).strength(0.8)),
    );
    forces
}

/// [`levelled`] with teams pulled into columns: `columns` maps a value of
/// `group_key` to a column index, spaced [`COLUMN_SPACING`] apart around
/// x = 0. Unlisted teams sit in column 0.
pub fn levelled_columns(
    options: &LayoutOptions,
    level_key: &str,
    group_key: &str,
    columns: &[(&str, f64)],
) -> ForceSet {
    let mut forces = levelled(options, level_key);
    let column = NodeParam::lookup(group_key, columns.iter().copied(), 0.0);
    set(
        &mut forces,
        "x",
        Box::new(PositionForce::x(column.scaled(COLUMN_SPACING)).strength(0.3)),
    );
    forces
}

/// Loose layout for flat organizations: very weak centring, stronger
/// repulsion, wide soft collision and light team clustering.
pub fn relaxed(options: &LayoutOptions, cluster_strength: f64) -> ForceSet {
    let mut forces = base(options);
    axis_pulls(&mut forces, options, 0.01);
    set(&mut forces, "charge", Box::new(ManyBodyForce::new().strength(-300.0)));
    set(
        &mut forces,
        "collision",
        Box::new(CollideForce::new(options.node_radius * 2.0).strength(0.2)),
    );
    set(
        &mut forces,
        "cluster",
        Box::new(ClusterForce::new("team", cluster_strength)),
    );
    forces
}

/// Look up a preset by name with its default extra arguments: cluster
/// strength 0.3 (0.1 for `relaxed`), hub group `team = "Platform"`, level
/// key `level`.
pub fn by_name(name: &str, options: &LayoutOptions) -> Option<ForceSet> {
    match name {
        "base" => Some(base(options)),
        "clustered" => Some(clustered(options, 0.3)),
        "edgeWeighted" => Some(edge_weighted(options)),
        "hubCentric" => Some(hub_centric(options, "team", "Platform")),
        "levelled" => Some(levelled(options, "level")),
        "relaxed" => Some(relaxed(options, 0.1)),
        _ => None,
    }
}
