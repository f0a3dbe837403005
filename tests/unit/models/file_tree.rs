use super::*;

fn sample_tree() -> (FileTree, NodeId, NodeId) {
    let mut tree = FileTree::new("Project");
    let root = tree.root();
    let src = tree.create_folder(root, "src").unwrap();
    tree.insert_file(src, "app.js", LanguageId::JavaScript, "class App {}\n")
        .unwrap();
    tree.insert_file(root, "index.html", LanguageId::Html, "<html></html>")
        .unwrap();
    (tree, root, src)
}

#[test]
fn new_tree_has_expanded_folder_root() {
    let tree = FileTree::new("Project");
    let root = tree.resolve(tree.root()).unwrap();
    assert!(root.is_folder());
    assert!(root.parent().is_none());
    assert!(tree.is_expanded(tree.root()));
    assert!(tree.validate().is_ok());
}

#[test]
fn create_file_round_trip() {
    let (mut tree, root, _) = sample_tree();
    let id = tree
        .create_file(root, "x.js", LanguageId::JavaScript)
        .unwrap();

    let node = tree.resolve(id).unwrap();
    assert!(node.is_dirty());
    assert_eq!(node.content(), "");
    assert_eq!(node.language(), Some(LanguageId::JavaScript));
    assert_eq!(node.parent(), Some(root));

    let parent = tree.resolve(root).unwrap();
    assert_eq!(parent.children().iter().filter(|&&c| c == id).count(), 1);
    assert_eq!(parent.children().last(), Some(&id));
    assert!(tree.validate().is_ok());
}

#[test]
fn create_appends_in_order() {
    let (mut tree, _, src) = sample_tree();
    let a = tree.create_file(src, "a.js", LanguageId::JavaScript).unwrap();
    let b = tree.create_folder(src, "lib").unwrap();
    let c = tree.create_file(src, "c.py", LanguageId::Python).unwrap();

    let children = tree.resolve(src).unwrap().children().to_vec();
    assert_eq!(&children[1..], &[a, b, c]);
    assert!(tree.resolve(b).unwrap().children().is_empty());
}

#[test]
fn create_under_file_or_missing_parent_fails() {
    let (mut tree, root, src) = sample_tree();
    let file = tree.find_by_path("src/app.js").unwrap();

    assert_eq!(
        tree.create_file(file, "nested.js", LanguageId::JavaScript),
        Err(FileTreeError::ParentNotFolder)
    );
    assert_eq!(
        tree.create_folder(file, "nested"),
        Err(FileTreeError::ParentNotFolder)
    );

    let mut other = FileTree::new("Other");
    let mut foreign = other.root();
    for name in ["a", "b", "c", "d", "e"] {
        foreign = other.create_folder(foreign, name).unwrap();
    }
    assert!(tree.resolve(foreign).is_none());
    assert_eq!(
        tree.create_folder(foreign, "x"),
        Err(FileTreeError::InvalidNodeId)
    );

    assert_eq!(
        tree.create_file(root, "   ", LanguageId::PlainText),
        Err(FileTreeError::EmptyName)
    );
    assert_eq!(tree.resolve(src).unwrap().children().len(), 1);
    assert!(tree.validate().is_ok());
}

#[test]
fn path_of_walks_to_root() {
    let (tree, root, _) = sample_tree();
    let app = tree.find_by_path("src/app.js").unwrap();

    assert_eq!(tree.path_of(app), vec!["Project", "src", "app.js"]);
    assert_eq!(tree.path_of(root), vec!["Project"]);
    assert_eq!(tree.display_path(app), "src/app.js");
    assert_eq!(tree.display_path(root), "");
}

#[test]
fn path_of_terminates_on_corrupted_cycle() {
    let (mut tree, _, src) = sample_tree();
    let app = tree.find_by_path("src/app.js").unwrap();
    // src -> app.js -> src
    tree.arena.get_mut(src).unwrap().parent = Some(app);

    let path = tree.path_of(app);
    assert!(path.len() <= tree.len());
    assert!(tree.validate().is_err());
}

#[test]
fn path_of_unknown_id_is_empty() {
    let (tree, _, _) = sample_tree();
    let mut other = FileTree::new("Other");
    let mut deep = other.root();
    for name in ["a", "b", "c", "d", "e"] {
        deep = other.create_folder(deep, name).unwrap();
    }
    assert!(tree.path_of(deep).is_empty());
    assert_eq!(tree.display_path(deep), "");
}

#[test]
fn toggle_expanded_flips_folders_only() {
    let (mut tree, root, src) = sample_tree();
    let app = tree.find_by_path("src/app.js").unwrap();

    assert!(!tree.is_expanded(src));
    assert!(tree.toggle_expanded(src));
    assert!(tree.is_expanded(src));
    assert!(tree.toggle_expanded(src));
    assert!(!tree.is_expanded(src));

    assert!(!tree.toggle_expanded(app));
    assert!(!tree.is_expanded(app));

    assert!(tree.toggle_expanded(root));
    assert!(!tree.is_expanded(root));
}

#[test]
fn mark_dirty_and_clean() {
    let (mut tree, _, src) = sample_tree();
    let app = tree.find_by_path("src/app.js").unwrap();

    assert!(!tree.resolve(app).unwrap().is_dirty());
    assert!(tree.mark_dirty(app, "changed"));
    assert_eq!(tree.resolve(app).unwrap().content(), "changed");
    assert!(tree.resolve(app).unwrap().is_dirty());

    assert!(tree.mark_clean(app));
    assert!(!tree.resolve(app).unwrap().is_dirty());
    assert!(!tree.mark_clean(app));

    assert!(!tree.mark_dirty(src, "folders have no content"));
    assert_eq!(tree.resolve(src).unwrap().content(), "");
}

#[test]
fn find_by_path_resolves_nested_entries() {
    let (tree, root, src) = sample_tree();
    assert_eq!(tree.find_by_path(""), Some(root));
    assert_eq!(tree.find_by_path("src"), Some(src));
    assert!(tree.find_by_path("src/missing.js").is_none());
    assert!(tree.find_by_path("index.html/child").is_none());
}

#[test]
fn flatten_for_view_honors_expansion() {
    let (mut tree, _, src) = sample_tree();

    let rows = tree.flatten_for_view("");
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Project", "src", "index.html"]);
    assert!(rows[1].is_folder);
    assert_eq!(rows[1].depth, 1);

    tree.toggle_expanded(src);
    let rows = tree.flatten_for_view("");
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Project", "src", "app.js", "index.html"]);
    assert_eq!(rows[2].depth, 2);
}

#[test]
fn flatten_for_view_filter_shows_matches_with_ancestors() {
    let (tree, _, _) = sample_tree();

    let rows = tree.flatten_for_view("APP");
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Project", "src", "app.js"]);

    assert!(tree.flatten_for_view("nothing-matches").is_empty());
}

#[test]
fn validate_detects_duplicate_child_listing() {
    let (mut tree, root, _) = sample_tree();
    let html = tree.find_by_path("index.html").unwrap();
    tree.arena.get_mut(root).unwrap().children.push(html);

    assert!(matches!(
        tree.validate(),
        Err(InvariantViolation::ListedTimes { times: 2, .. })
    ));
}

#[test]
fn every_non_root_node_is_listed_once_after_many_creates() {
    let mut tree = FileTree::new("Project");
    let mut folders = vec![tree.root()];
    for i in 0..40 {
        let parent = folders[i % folders.len()];
        if i % 3 == 0 {
            folders.push(tree.create_folder(parent, &format!("dir{i}")).unwrap());
        } else {
            tree.create_file(parent, &format!("f{i}.txt"), LanguageId::PlainText)
                .unwrap();
        }
    }
    assert_eq!(tree.len(), 41);
    assert!(tree.validate().is_ok());
}

#[test]
fn flatten_for_view_saturates_depth_of_deep_chains() {
    let mut tree = FileTree::new("Project");
    let levels = usize::from(u16::MAX) + 10;
    let mut parent = tree.root();
    for _ in 0..levels {
        parent = tree.create_folder(parent, "d").unwrap();
        tree.set_expanded(parent, true);
    }

    let rows = tree.flatten_for_view("");
    assert_eq!(rows.len(), levels + 1);
    assert_eq!(rows[1].depth, 1);
    assert_eq!(rows.last().unwrap().depth, u16::MAX);
}
