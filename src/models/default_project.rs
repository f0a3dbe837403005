//! 启动时装载的示例项目

use super::file_tree::{FileTree, FileTreeError};
use crate::kernel::language::LanguageId;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>My Project</title>
  <link rel="stylesheet" href="styles.css">
</head>
<body>
  <div id="app"></div>
  <script src="main.js"></script>
</body>
</html>"#;

const STYLES_CSS: &str = r#"body {
  font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
  margin: 0;
  padding: 20px;
  background-color: #f5f5f5;
}

#app {
  max-width: 1200px;
  margin: 0 auto;
  background-color: white;
  padding: 20px;
  border-radius: 5px;
  box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1);
}"#;

const MAIN_JS: &str = r#"// Main application code
document.addEventListener('DOMContentLoaded', () => {
  const app = document.getElementById('app');

  // Create a heading element
  const heading = document.createElement('h1');
  heading.textContent = 'Hello, VS Code Clone!';

  // Create a paragraph element
  const paragraph = document.createElement('p');
  paragraph.textContent = 'This is a simple web application created in our VS Code clone.';

  // Append elements to the app container
  app.appendChild(heading);
  app.appendChild(paragraph);

  console.log('Application initialized');
});"#;

const APP_JS: &str = r#"// App component
class App {
  constructor() {
    this.state = {
      count: 0
    };
  }

  increment() {
    this.state.count++;
    this.render();
  }

  decrement() {
    this.state.count--;
    this.render();
  }

  render() {
    // Update UI based on state
    console.log('Current count:', this.state.count);
  }
}

export default App;"#;

const UTILS_JS: &str = r#"// Utility functions

/**
 * Formats a date to a readable string
 * @param {Date} date - The date to format
 * @returns {string} Formatted date string
 */
export function formatDate(date) {
  return new Date(date).toLocaleDateString();
}

/**
 * Debounces a function call
 * @param {Function} func - The function to debounce
 * @param {number} wait - Wait time in milliseconds
 * @returns {Function} Debounced function
 */
export function debounce(func, wait) {
  let timeout;
  return function(...args) {
    const context = this;
    clearTimeout(timeout);
    timeout = setTimeout(() => func.apply(context, args), wait);
  };
}"#;

const SCRIPT_PY: &str = r#"# Python example script

def greet(name):
    """
    Simple greeting function

    Args:
        name (str): Name to greet

    Returns:
        str: Greeting message
    """
    return f"Hello, {name}!"

class Calculator:
    """A simple calculator class"""

    def __init__(self, initial_value=0):
        self.value = initial_value

    def add(self, x):
        self.value += x
        return self

    def subtract(self, x):
        self.value -= x
        return self

    def multiply(self, x):
        self.value *= x
        return self

    def divide(self, x):
        if x == 0:
            raise ValueError("Cannot divide by zero")
        self.value /= x
        return self

    def get_result(self):
        return self.value

# Example usage
if __name__ == "__main__":
    print(greet("World"))

    calc = Calculator(10)
    result = calc.add(5).multiply(2).subtract(8).divide(2).get_result()
    print(f"Calculator result: {result}")
"#;

const UNTITLED_JS: &str = "// This is a temporary file\nconsole.log('Hello world');";

/// 构建示例项目树。
///
/// 插入顺序即存储顺序，全局搜索按此顺序扫描文件。
pub fn default_project() -> Result<FileTree, FileTreeError> {
    let mut tree = FileTree::new("Project");
    let root = tree.root();

    let src = tree.create_folder(root, "src")?;
    tree.insert_file(root, "index.html", LanguageId::Html, INDEX_HTML)?;
    tree.insert_file(root, "styles.css", LanguageId::Css, STYLES_CSS)?;
    tree.insert_file(root, "main.js", LanguageId::JavaScript, MAIN_JS)?;
    tree.insert_file(src, "app.js", LanguageId::JavaScript, APP_JS)?;
    tree.insert_file(src, "utils.js", LanguageId::JavaScript, UTILS_JS)?;
    tree.insert_file(root, "script.py", LanguageId::Python, SCRIPT_PY)?;
    let untitled = tree.insert_file(root, "untitled-1.js", LanguageId::JavaScript, "")?;
    tree.mark_dirty(untitled, UNTITLED_JS);

    Ok(tree)
}
