//! Scripted browser that models the todo frontend's DOM.
//!
//! Only the selectors the UI scenarios use are understood; anything else
//! reports "not found", like a real page would.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use todo_e2e::{BrowserDriver, DomElement, E2eError, E2eResult};

#[derive(Debug, Clone)]
pub struct FakeTask {
    pub id: u32,
    pub title: String,
    pub completed: bool,
    /// Probes left before a pending toggle lands
    pub pending: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct FakeList {
    pub id: u32,
    pub title: String,
    pub tasks: Vec<FakeTask>,
}

#[derive(Debug, Default)]
pub struct Dom {
    pub logged_in: bool,
    pub inputs: HashMap<String, String>,
    pub list_form_open: bool,
    pub task_form_open: bool,
    pub lists: Vec<FakeList>,
    pub selected: Option<u32>,
    pub confirmation_for: Option<u32>,
    next_id: u32,

    /// Ask for confirmation before deleting a list
    pub confirm_deletes: bool,
    /// Page probes before a checkbox click shows as completed
    pub completion_delay: u32,
    /// `.add-task` does nothing
    pub broken_add_task: bool,

    pub navigations: Vec<String>,
    pub screenshots: Vec<PathBuf>,
    pub close_calls: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    LoginForm,
    Input(String),
    LoginSubmit,
    Lists,
    Logout,
    AddList,
    ListForm,
    ListSubmit,
    List(u32),
    DeleteList(u32),
    Tasks,
    AddTask,
    TaskForm,
    TaskSubmit,
    Task(u32),
    Checkbox(u32),
    Confirmation,
    ConfirmDelete,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a list that existed before the suite started.
    pub fn with_list(mut self, title: &str) -> Self {
        let id = self.next();
        self.lists.push(FakeList {
            id,
            title: title.to_string(),
            tasks: Vec::new(),
        });
        self
    }

    pub fn confirming_deletes(mut self) -> Self {
        self.confirm_deletes = true;
        self
    }

    pub fn completing_after(mut self, probes: u32) -> Self {
        self.completion_delay = probes;
        self
    }

    pub fn with_broken_add_task(mut self) -> Self {
        self.broken_add_task = true;
        self
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn selected_list(&mut self) -> Option<&mut FakeList> {
        let id = self.selected?;
        self.lists.iter_mut().find(|l| l.id == id)
    }

    fn task_mut(&mut self, id: u32) -> Option<&mut FakeTask> {
        self.lists
            .iter_mut()
            .flat_map(|l| l.tasks.iter_mut())
            .find(|t| t.id == id)
    }

    fn task(&self, id: u32) -> Option<&FakeTask> {
        self.lists.iter().flat_map(|l| l.tasks.iter()).find(|t| t.id == id)
    }

    /// Advance pending toggles by one probe.
    fn tick(&mut self) {
        for task in self.lists.iter_mut().flat_map(|l| l.tasks.iter_mut()) {
            match task.pending {
                Some(0) => {
                    task.completed = !task.completed;
                    task.pending = None;
                }
                Some(n) => task.pending = Some(n - 1),
                None => {}
            }
        }
    }

    fn query(&mut self, selector: &str) -> Vec<Node> {
        self.tick();

        if let Some(rest) = selector.strip_prefix(r#".task[data-id=""#) {
            let (id, suffix) = rest.split_once(r#""]"#).unwrap_or((rest, ""));
            let Ok(id) = id.parse::<u32>() else {
                return Vec::new();
            };
            return match self.task(id) {
                Some(task) if suffix.is_empty() || (suffix == ".completed" && task.completed) => {
                    vec![Node::Task(id)]
                }
                _ => Vec::new(),
            };
        }

        let logged_in = self.logged_in;
        let has_selection = self.selected.is_some();
        let one = |cond: bool, node: Node| if cond { vec![node] } else { Vec::new() };

        match selector {
            "form" => one(!logged_in, Node::LoginForm),
            r#"input[name="email"]"# | r#"input[name="password"]"# => {
                let name = if selector.contains("email") { "email" } else { "password" };
                one(!logged_in, Node::Input(name.to_string()))
            }
            r#"button[type="submit"]"# => one(!logged_in, Node::LoginSubmit),
            ".lists" => one(logged_in, Node::Lists),
            ".logout" => one(logged_in, Node::Logout),
            ".add-list" => one(logged_in, Node::AddList),
            ".list-form" => one(self.list_form_open, Node::ListForm),
            r#"input[name="list_title"]"# => one(self.list_form_open, Node::Input("list_title".to_string())),
            r#".list-form button[type="submit"]"# => one(self.list_form_open, Node::ListSubmit),
            ".list" if logged_in => self.lists.iter().map(|l| Node::List(l.id)).collect(),
            ".tasks" => one(logged_in && has_selection, Node::Tasks),
            ".add-task" => one(logged_in && has_selection, Node::AddTask),
            ".task-form" => one(self.task_form_open, Node::TaskForm),
            r#"input[name="title"]"# => one(self.task_form_open, Node::Input("title".to_string())),
            r#".task-form button[type="submit"]"# => one(self.task_form_open, Node::TaskSubmit),
            ".task" => match self.selected_list() {
                Some(list) => list.tasks.iter().map(|t| Node::Task(t.id)).collect(),
                None => Vec::new(),
            },
            ".confirmation" => one(self.confirmation_for.is_some(), Node::Confirmation),
            ".confirm-delete" => one(self.confirmation_for.is_some(), Node::ConfirmDelete),
            _ => Vec::new(),
        }
    }

    fn child(&self, parent: &Node, selector: &str) -> Option<Node> {
        match (parent, selector) {
            (Node::List(id), ".delete-list") => Some(Node::DeleteList(*id)),
            (Node::Task(id), r#"input[type="checkbox"]"#) => Some(Node::Checkbox(*id)),
            _ => None,
        }
    }

    fn take_input(&mut self, name: &str) -> String {
        self.inputs.remove(name).unwrap_or_default()
    }

    fn remove_list(&mut self, id: u32) {
        self.lists.retain(|l| l.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    fn click(&mut self, node: &Node) {
        match node {
            Node::LoginSubmit => {
                let email = self.take_input("email");
                let password = self.take_input("password");
                self.logged_in = email == "admin@todo.com" && password == "admin";
            }
            Node::Logout => {
                self.logged_in = false;
                self.selected = None;
            }
            Node::AddList => self.list_form_open = true,
            Node::ListSubmit => {
                let title = self.take_input("list_title");
                let id = self.next();
                self.lists.push(FakeList {
                    id,
                    title,
                    tasks: Vec::new(),
                });
                self.list_form_open = false;
            }
            Node::List(id) => self.selected = Some(*id),
            Node::AddTask if !self.broken_add_task => self.task_form_open = true,
            Node::TaskSubmit => {
                let title = self.take_input("title");
                let id = self.next();
                if let Some(list) = self.selected_list() {
                    list.tasks.push(FakeTask {
                        id,
                        title,
                        completed: false,
                        pending: None,
                    });
                }
                self.task_form_open = false;
            }
            Node::Checkbox(id) => {
                let delay = self.completion_delay;
                if let Some(task) = self.task_mut(*id) {
                    if delay == 0 {
                        task.completed = !task.completed;
                    } else {
                        task.pending = Some(delay);
                    }
                }
            }
            Node::DeleteList(id) => {
                if self.confirm_deletes {
                    self.confirmation_for = Some(*id);
                } else {
                    self.remove_list(*id);
                }
            }
            Node::ConfirmDelete => {
                if let Some(id) = self.confirmation_for.take() {
                    self.remove_list(id);
                }
            }
            _ => {}
        }
    }

    fn text(&self, node: &Node) -> String {
        match node {
            Node::List(id) => self
                .lists
                .iter()
                .find(|l| l.id == *id)
                .map(|l| l.title.clone())
                .unwrap_or_default(),
            Node::Task(id) => self.task(*id).map(|t| t.title.clone()).unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        match (node, name) {
            (Node::Task(id), "data-id") | (Node::List(id), "data-id") => Some(id.to_string()),
            (Node::Task(id), "class") => self.task(*id).map(|t| {
                if t.completed {
                    "task completed".to_string()
                } else {
                    "task".to_string()
                }
            }),
            (Node::List(_), "class") => Some("list".to_string()),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct FakeBrowser {
    dom: Arc<Mutex<Dom>>,
}

impl FakeBrowser {
    pub fn new(dom: Dom) -> Self {
        Self {
            dom: Arc::new(Mutex::new(dom)),
        }
    }

    /// Shared handle for inspecting the page after the suite has run.
    pub fn dom(&self) -> Arc<Mutex<Dom>> {
        self.dom.clone()
    }

    fn element(&self, node: Node) -> Box<dyn DomElement> {
        Box::new(FakeElement {
            dom: self.dom.clone(),
            node,
        })
    }
}

#[async_trait]
impl BrowserDriver for FakeBrowser {
    async fn navigate(&self, url: &str) -> E2eResult<()> {
        self.dom.lock().unwrap().navigations.push(url.to_string());
        Ok(())
    }

    async fn find_element(&self, selector: &str) -> E2eResult<Box<dyn DomElement>> {
        let node = self.dom.lock().unwrap().query(selector).into_iter().next();
        node.map(|n| self.element(n))
            .ok_or_else(|| E2eError::ElementNotFound(selector.to_string()))
    }

    async fn find_elements(&self, selector: &str) -> E2eResult<Vec<Box<dyn DomElement>>> {
        let nodes = self.dom.lock().unwrap().query(selector);
        Ok(nodes.into_iter().map(|n| self.element(n)).collect())
    }

    async fn screenshot(&self, path: &Path) -> E2eResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, b"\x89PNG")?;
        self.dom.lock().unwrap().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn close(&mut self) -> E2eResult<()> {
        self.dom.lock().unwrap().close_calls += 1;
        Ok(())
    }
}

struct FakeElement {
    dom: Arc<Mutex<Dom>>,
    node: Node,
}

#[async_trait]
impl DomElement for FakeElement {
    async fn send_keys(&self, text: &str) -> E2eResult<()> {
        match &self.node {
            Node::Input(name) => {
                let mut dom = self.dom.lock().unwrap();
                dom.inputs.entry(name.clone()).or_default().push_str(text);
                Ok(())
            }
            other => Err(E2eError::AssertionFailed(format!("cannot type into {:?}", other))),
        }
    }

    async fn click(&self) -> E2eResult<()> {
        self.dom.lock().unwrap().click(&self.node);
        Ok(())
    }

    async fn is_displayed(&self) -> E2eResult<bool> {
        Ok(true)
    }

    async fn attribute(&self, name: &str) -> E2eResult<Option<String>> {
        Ok(self.dom.lock().unwrap().attribute(&self.node, name))
    }

    async fn text(&self) -> E2eResult<String> {
        Ok(self.dom.lock().unwrap().text(&self.node))
    }

    async fn find_child(&self, selector: &str) -> E2eResult<Box<dyn DomElement>> {
        let child = self.dom.lock().unwrap().child(&self.node, selector);
        child
            .map(|node| {
                Box::new(FakeElement {
                    dom: self.dom.clone(),
                    node,
                }) as Box<dyn DomElement>
            })
            .ok_or_else(|| E2eError::ElementNotFound(selector.to_string()))
    }
}
