use crate::vfs::{EntryStatus, VirtualEntry, VirtualFS};
use colored::{ColoredString, Colorize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Represents a node in the tree (either file or directory).
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    is_file: bool,
    status: EntryStatus,
}
impl TreeNode {
    fn new(name: String, is_file: bool, status: EntryStatus) -> Self {
        Self {
            name,
            children: Vec::new(),
            is_file,
            status,
        }
    }

    fn label(&self) -> ColoredString {
        match (self.status, self.is_file) {
            (EntryStatus::Conflict, _) => format!("{} (conflict)", self.name).red().bold(),
            (EntryStatus::Exists, _) => self.name.dimmed(),
            (EntryStatus::Create, true) => self.name.green(),
            (EntryStatus::Create, false) => self.name.blue(),
        }
    }
}

/// Build the directory tree from the VFS entries, returning the root node.
fn build_tree(vfs: &VirtualFS, destination: &Path) -> Rc<RefCell<TreeNode>> {
    let root_name = destination
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| destination.display().to_string());

    let root_status = if destination.is_dir() {
        EntryStatus::Exists
    } else {
        EntryStatus::Create
    };

    let root = Rc::new(RefCell::new(TreeNode::new(root_name, false, root_status)));

    // map relative path to node, the root is the empty path
    let mut lookup: HashMap<PathBuf, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(PathBuf::new(), Rc::clone(&root));

    for VirtualEntry {
        destination: rel_path,
        is_file,
        status,
    } in &vfs.entries
    {
        let parent_path = rel_path.parent().unwrap_or_else(|| Path::new(""));

        let Some(parent_node) = lookup.get(parent_path).map(Rc::clone) else {
            // plans list parents first, so this only happens for hand-built VFS values
            log::debug!(
                "parent: {}, not found for path: {}",
                parent_path.display(),
                rel_path.display()
            );
            continue;
        };

        let child_name = rel_path
            .file_name()
            .map(|os| os.to_string_lossy().to_string())
            .unwrap_or_else(|| rel_path.display().to_string());

        let new_child = Rc::new(RefCell::new(TreeNode::new(child_name, *is_file, *status)));

        parent_node
            .borrow_mut()
            .children
            .push(Rc::clone(&new_child));

        lookup.insert(rel_path.clone(), new_child);
    }

    root
}

/// Render the tree with a nice ASCII style, one line per node.
fn render_tree(node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool, out: &mut Vec<String>) {
    let node_borrow = node.borrow();

    let connector = if is_last {
        "└── ".yellow()
    } else {
        "├── ".yellow()
    };
    out.push(format!("{}{}{}", prefix.yellow(), connector, node_borrow.label()));

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        let last = i == len - 1;
        render_tree(child, &child_prefix, last, out);
    }
}

pub fn preview_as_tree(vfs: &VirtualFS, destination: &Path) {
    let tree_root = build_tree(vfs, destination);

    println!(
        "Legend: {} = (new directory), {} = (new file), {} = (already present), {} = (conflict)",
        "blue".blue(),
        "green".green(),
        "dimmed".dimmed(),
        "red".red().bold()
    );

    let fancy_prompt = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    println!("{}", fancy_prompt);

    let mut lines = Vec::new();
    render_tree(&tree_root, "", true, &mut lines);
    for line in lines {
        println!("{}", line);
    }

    let fancy_summary = format!(
        "\n{} {} to create, {} already present, {} in conflict\n",
        "└─".bold().bright_blue(),
        vfs.count(EntryStatus::Create).to_string().bright_green(),
        vfs.count(EntryStatus::Exists),
        vfs.count(EntryStatus::Conflict).to_string().red()
    );

    println!("{}", fancy_summary);
}
