//! Context menus.
//!
//! The canvas holds at most one open menu. Hosts render
//! [`menu_items`] however they like and report the chosen
//! [`MenuAction`] back through [`Canvas::apply_menu_action`](crate::Canvas::apply_menu_action).

use edno_core::{ArrowId, ArrowKind, FormNames, NodeId, Point};

/// What a menu was opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    Canvas,
    Node(NodeId),
    Arrow(ArrowId),
}

/// An open context menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub target: MenuTarget,
    /// Logical position the menu was opened at; new nodes are placed here.
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Place a node of a registered type at the menu position.
    AddNode { type_tag: String },
    /// Start drawing an arrow from the menu's node.
    StartPath(ArrowKind),
    RenameNode,
    DeleteNode,
    /// Ask for a new parameter label of the menu's arrow.
    RenameParameter,
    DeleteArrow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
}

impl MenuItem {
    fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Entries of the menu for `target`, in display order.
pub fn menu_items(target: MenuTarget, forms: &FormNames) -> Vec<MenuItem> {
    match target {
        MenuTarget::Canvas => vec![
            MenuItem::new(
                format!("Add {}", forms.ellipse),
                MenuAction::AddNode {
                    type_tag: forms.ellipse.clone(),
                },
            ),
            MenuItem::new(
                format!("Add {}", forms.rectangle),
                MenuAction::AddNode {
                    type_tag: forms.rectangle.clone(),
                },
            ),
        ],
        MenuTarget::Node(_) => vec![
            MenuItem::new("Add Path", MenuAction::StartPath(ArrowKind::Directed)),
            MenuItem::new("Add Covariance", MenuAction::StartPath(ArrowKind::Bidirected)),
            MenuItem::new("Add Line", MenuAction::StartPath(ArrowKind::Undirected)),
            MenuItem::new("Rename Node", MenuAction::RenameNode),
            MenuItem::new("Delete Node", MenuAction::DeleteNode),
        ],
        MenuTarget::Arrow(_) => vec![
            MenuItem::new("Delete", MenuAction::DeleteArrow),
            MenuItem::new("Rename", MenuAction::RenameParameter),
        ],
    }
}
