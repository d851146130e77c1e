//! Rebuilds nested lists from flat, indentation-delimited list lines.
//!
//! # The High-Level Concept
//!
//! List lines carry no explicit open/close markers; nesting is only implied by
//! indentation. The builder keeps a stack of open lists, each remembering the
//! indentation of its items. The stack top is the list currently receiving
//! items.
//!
//! # The Algorithm
//!
//! For every item at indentation `i`:
//!
//! 1. Close (pop) every open list indented deeper than `i`. A popped list is
//!    attached to the last item of the list below it, or handed out as a
//!    finished top-level list when the stack becomes empty.
//! 2. If the top is at exactly `i`, the item is a sibling. A change between
//!    ordered and unordered markers at the same level closes the top and
//!    starts a new list in its place.
//! 3. Otherwise (empty stack, or top shallower than `i`) a new list is pushed.
//!
//! [`ListBuilder::finish`] closes everything that is still open.

use crate::ir::nodes::{InlineContent, List, ListItem};

#[derive(Debug)]
struct OpenList {
    indent: usize,
    list: List,
}

/// Indentation-driven list tree builder.
#[derive(Debug, Default)]
pub struct ListBuilder {
    stack: Vec<OpenList>,
    finished: Vec<List>,
}

impl ListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty() && self.finished.is_empty()
    }

    pub fn push_item(&mut self, indent: usize, ordered: bool, content: Vec<InlineContent>) {
        while self.stack.last().is_some_and(|top| top.indent > indent) {
            self.close_top();
        }

        let item = ListItem {
            content,
            children: Vec::new(),
        };

        let same_level = self.stack.last().filter(|top| top.indent == indent);
        match same_level.map(|top| top.list.ordered == ordered) {
            Some(true) => {
                if let Some(top) = self.stack.last_mut() {
                    top.list.items.push(item);
                }
                return;
            }
            Some(false) => self.close_top(),
            None => {}
        }

        self.stack.push(OpenList {
            indent,
            list: List {
                ordered,
                items: vec![item],
            },
        });
    }

    fn close_top(&mut self) {
        let Some(top) = self.stack.pop() else {
            return;
        };
        match self
            .stack
            .last_mut()
            .and_then(|parent| parent.list.items.last_mut())
        {
            Some(parent_item) => parent_item.children.push(top.list),
            None => self.finished.push(top.list),
        }
    }

    /// Close every open list and return the top-level lists in order.
    pub fn finish(&mut self) -> Vec<List> {
        while !self.stack.is_empty() {
            self.close_top();
        }
        std::mem::take(&mut self.finished)
    }
}

/// Limit nesting below `list` to `max_depth` levels of sub-lists.
///
/// Items of lists nested deeper than allowed are hoisted into the deepest
/// permitted list, directly after the item that owned them.
pub fn clamp_nesting(list: &mut List, max_depth: usize) {
    if max_depth == 0 {
        let items = std::mem::take(&mut list.items);
        for mut item in items {
            let children = std::mem::take(&mut item.children);
            list.items.push(item);
            for mut child in children {
                clamp_nesting(&mut child, 0);
                list.items.extend(child.items);
            }
        }
        return;
    }
    for item in &mut list.items {
        for child in &mut item.children {
            clamp_nesting(child, max_depth - 1);
        }
    }
}
