//! Singly linked list used by the memory benchmark.
//!
//! `head` and every `next` are [`Link`]s and own the node after them. `tail`
//! is a plain pointer to the last node so that `push_back` does not have to
//! walk the chain; it is never used to free anything.
//!
//! Nodes are kept as raw pointers from `Box::into_raw` for their whole life
//! and are turned back into a `Box` only in `Drop`, so writing through `tail`
//! never races with a move of the owning edge.

use std::alloc::{self, Layout};
use std::fmt;
use std::hint::black_box;
use std::io::{self, Write};
use std::iter;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::{Error, Result};

pub struct LinkedList<T> {
    head: Link<T>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    _owns: PhantomData<Box<Node<T>>>,
}

/// Owning edge to the next node. Only `LinkedList::drop` frees what it
/// points at.
struct Link<T>(Option<NonNull<Node<T>>>);

struct Node<T> {
    elem: T,
    next: Link<T>,
}

impl<T> Link<T> {
    const fn empty() -> Self {
        Link(None)
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    fn is_some(&self) -> bool {
        self.0.is_some()
    }

    fn is_none(&self) -> bool {
        self.0.is_none()
    }

    fn as_deref(&self) -> Option<&Node<T>> {
        // SAFETY: a linked node stays allocated until the list that owns the
        // chain is dropped, and shared borrows of it never outlive `&self`.
        self.0.map(|node| unsafe { &*node.as_ptr() })
    }
}

impl<T> Node<T> {
    fn new(elem: T) -> Self {
        Node {
            elem,
            next: Link::empty(),
        }
    }

    fn alloc(elem: T) -> NonNull<Self> {
        // SAFETY: `Box::into_raw` never returns null.
        unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Node::new(elem)))) }
    }

    /// Allocates a node through the global allocator, reporting failure
    /// instead of aborting the process.
    fn try_alloc(elem: T) -> Result<NonNull<Self>> {
        // `next` is always present, so the layout is never zero-sized.
        let layout = Layout::new::<Self>();
        let raw = unsafe { alloc::alloc(layout) }.cast::<Self>();
        let ptr = NonNull::new(raw).ok_or(Error::AllocationFailure)?;

        // SAFETY: `ptr` is fresh memory with the layout of `Node<T>` from the
        // global allocator, so `Box::from_raw` in `drop` may free it.
        unsafe { ptr.as_ptr().write(Node::new(elem)) };
        Ok(ptr)
    }
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        LinkedList {
            head: Link::empty(),
            tail: None,
            len: 0,
            _owns: PhantomData,
        }
    }

    pub fn with_value(elem: T) -> Self {
        let mut list = Self::new();
        list.push_front(elem);
        list
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn push_front(&mut self, elem: T) {
        self.link_front(Node::alloc(elem));
    }

    pub fn push_back(&mut self, elem: T) {
        self.link_back(Node::alloc(elem));
    }

    /// Like [`push_front`](Self::push_front), but returns
    /// [`Error::AllocationFailure`] when the node cannot be allocated.
    pub fn try_push_front(&mut self, elem: T) -> Result<()> {
        self.link_front(Node::try_alloc(elem)?);
        Ok(())
    }

    /// Like [`push_back`](Self::push_back), but returns
    /// [`Error::AllocationFailure`] when the node cannot be allocated.
    pub fn try_push_back(&mut self, elem: T) -> Result<()> {
        self.link_back(Node::try_alloc(elem)?);
        Ok(())
    }

    fn link_front(&mut self, node: NonNull<Node<T>>) {
        // 旧的 head 整条链交给新节点的 next
        // SAFETY: `node` is freshly allocated and not linked anywhere yet.
        unsafe { (*node.as_ptr()).next = self.head.take() };
        self.head = Link(Some(node));

        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.len += 1;
    }

    fn link_back(&mut self, node: NonNull<Node<T>>) {
        match self.tail {
            // SAFETY: `tail` points at the last node of the chain owned by
            // `head`, and nodes are only released when the whole list drops.
            Some(tail) => unsafe { (*tail.as_ptr()).next = Link(Some(node)) },
            None => self.head = Link(Some(node)),
        }

        self.tail = Some(node);
        self.len += 1;
    }

    /// Walks the list from head to tail, calling `visitor` on every element.
    ///
    /// With `None` the walk still touches every node: each step goes through
    /// [`black_box`], so the loop survives optimisation and can be timed.
    pub fn traverse<F>(&self, mut visitor: Option<F>)
    where
        F: FnMut(&T),
    {
        let mut cur = self.head.as_deref();
        while let Some(node) = black_box(cur) {
            if let Some(visit) = visitor.as_mut() {
                visit(&node.elem);
            }
            cur = node.next.as_deref();
        }
    }

    /// Visits every node without a callback.
    pub fn walk(&self) {
        self.traverse(None::<fn(&T)>);
    }

    /// Builds a new list holding `transform(elem)` for every element, in
    /// order. `self` is left untouched.
    pub fn map<U, F>(&self, mut transform: F) -> LinkedList<U>
    where
        F: FnMut(&T) -> U,
    {
        let mut mapped = LinkedList::new();
        self.traverse(Some(|elem: &T| mapped.push_back(transform(elem))));
        mapped
    }

    /// Writes `[e1, e2, ..., en]` followed by a newline.
    pub fn display<W: Write>(&self, out: &mut W) -> io::Result<()>
    where
        T: fmt::Display,
    {
        writeln!(out, "{self}")
    }

    fn elems(&self) -> impl Iterator<Item = &T> {
        iter::successors(self.head.as_deref(), |node| node.next.as_deref())
            .map(|node| &node.elem)
    }
}

impl<T> Drop for LinkedList<T> {
    fn drop(&mut self) {
        self.tail = None;

        // 逐个取出 next 再释放当前节点, 析构深度与链表长度无关
        let mut cur_link = self.head.take();
        while let Some(node) = cur_link.0 {
            // SAFETY: every linked node came from `Node::alloc` or
            // `Node::try_alloc` and is owned by exactly one link.
            let mut boxed = unsafe { Box::from_raw(node.as_ptr()) };
            cur_link = boxed.next.take();
        }
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<T> for LinkedList<T> {
    fn from(elem: T) -> Self {
        Self::with_value(elem)
    }
}

/// Deep copy: every node is allocated again.
impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        self.map(T::clone)
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.push_back(elem);
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.elems().eq(other.elems())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T: fmt::Display> fmt::Display for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;

        let mut cur = self.head.as_deref();
        while let Some(node) = cur {
            write!(f, "{}", node.elem)?;

            if node.next.is_some() {
                write!(f, ", ")?;
            }
            cur = node.next.as_deref();
        }

        write!(f, "]")
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elems()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn assert_invariants<T>(list: &LinkedList<T>) {
        assert_eq!(list.head.is_none(), list.tail.is_none());

        let mut count = 0;
        let mut last: Option<*const Node<T>> = None;
        let mut cur = list.head.as_deref();
        while let Some(node) = cur {
            count += 1;
            last = Some(node as *const Node<T>);
            cur = node.next.as_deref();
        }

        assert_eq!(count, list.len);
        assert_eq!(last, list.tail.map(|tail| tail.as_ptr() as *const Node<T>));
    }

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_push_back_keeps_order() {
        let mut list = LinkedList::new();
        assert_invariants(&list);

        list.push_back(1);
        list.push_back(2);
        list.push_back(3);

        assert_invariants(&list);
        assert_eq!(list.to_string(), "[1, 2, 3]");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_push_front_reverses_order() {
        let mut list = LinkedList::new();
        list.push_front(1);
        assert_invariants(&list);
        list.push_front(2);

        assert_invariants(&list);
        assert_eq!(list.to_string(), "[2, 1]");
    }

    #[test]
    fn test_interleaved_pushes() {
        let mut list = LinkedList::new();
        list.push_back(1);
        list.push_front(2);
        list.push_back(3);
        list.push_front(4);

        assert_invariants(&list);
        assert_eq!(list.to_string(), "[4, 2, 1, 3]");
    }

    #[test]
    fn test_push_back_after_single_push_front() {
        let mut list = LinkedList::with_value(1);
        assert_invariants(&list);

        list.push_back(2);
        assert_invariants(&list);
        assert_eq!(list.to_string(), "[1, 2]");
    }

    #[test]
    fn test_push_back_after_push_front_on_single_node() {
        let mut list = LinkedList::new();
        list.push_back(1);
        list.push_front(2);
        assert_invariants(&list);

        list.push_back(3);
        assert_invariants(&list);
        assert_eq!(list.to_string(), "[2, 1, 3]");

        let mut list = LinkedList::with_value(1);
        list.push_front(2);
        list.push_back(3);
        list.push_front(4);
        list.push_back(5);
        assert_invariants(&list);
        assert_eq!(list.to_string(), "[4, 2, 1, 3, 5]");
    }

    #[test]
    fn test_try_push() -> Result<()> {
        let mut list = LinkedList::new();
        list.try_push_back(String::from("b"))?;
        list.try_push_front(String::from("a"))?;
        list.try_push_back(String::from("c"))?;

        assert_invariants(&list);
        assert_eq!(list.to_string(), "[a, b, c]");
        Ok(())
    }

    #[test]
    fn test_traverse_visits_in_order() {
        let list: LinkedList<i32> = (1..=5).collect();

        let mut seen = Vec::new();
        list.traverse(Some(|elem: &i32| seen.push(*elem)));
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);

        list.walk();
        list.traverse(None::<fn(&i32)>);
        assert_eq!(list.to_string(), "[1, 2, 3, 4, 5]");
    }

    #[test]
    fn test_traverse_empty() {
        let list: LinkedList<i32> = LinkedList::new();
        let mut calls = 0;
        list.traverse(Some(|_: &i32| calls += 1));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_map_leaves_source_alone() {
        let list: LinkedList<i32> = vec![1, 2, 3].into_iter().collect();

        let doubled = list.map(|x| x * 2);
        assert_invariants(&doubled);
        assert_eq!(doubled.to_string(), "[2, 4, 6]");
        assert_eq!(list.to_string(), "[1, 2, 3]");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_map_changes_type() {
        let list: LinkedList<i32> = vec![7, 42].into_iter().collect();
        let labels: LinkedList<String> = list.map(|x| format!("#{x}"));
        assert_eq!(labels.to_string(), "[#7, #42]");

        let empty: LinkedList<i32> = LinkedList::new();
        let mapped = empty.map(|x| x + 1);
        assert!(mapped.is_empty());
        assert_invariants(&mapped);
    }

    #[test]
    fn test_display() -> io::Result<()> {
        let empty: LinkedList<i32> = LinkedList::new();
        assert_eq!(empty.to_string(), "[]");

        let mut out = Vec::new();
        empty.display(&mut out)?;
        LinkedList::from(5).display(&mut out)?;
        assert_eq!(String::from_utf8_lossy(&out), "[]\n[5]\n");
        Ok(())
    }

    #[test]
    fn test_clone_is_deep() {
        let hits = Rc::new(Cell::new(0));
        let mut list = LinkedList::new();
        list.push_back(Rc::clone(&hits));

        let copy = list.clone();
        assert_invariants(&copy);
        assert_eq!(Rc::strong_count(&hits), 3);
        assert_ne!(list.head.0, copy.head.0);

        drop(list);
        assert_eq!(copy.len(), 1);
        drop(copy);
        assert_eq!(Rc::strong_count(&hits), 1);
    }

    #[test]
    fn test_drop_releases_every_node_once() {
        let drops = Rc::new(Cell::new(0));
        let mut list = LinkedList::new();
        for i in 0..100 {
            if i % 2 == 0 {
                list.push_back(DropCounter(Rc::clone(&drops)));
            } else {
                list.push_front(DropCounter(Rc::clone(&drops)));
            }
        }

        assert_eq!(drops.get(), 0);
        drop(list);
        assert_eq!(drops.get(), 100);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_long_list_drop() {
        // 在很小的栈上构造并释放一百万个节点
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(|| {
                let mut list = LinkedList::new();
                for i in 0..1_000_000 {
                    list.push_back(i);
                }
                list.push_front(-1);
                assert_eq!(list.len(), 1_000_001);
                list.walk();
                drop(list);
            })
            .unwrap();

        handle.join().unwrap();
    }
}
