use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    /// RDATA of a NetBIOS positive name query response.
    NetBiosLocator(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Owner name, echoed verbatim from the question.
    pub name: Arc<str>,
    pub ttl: u32,
    pub data: AnswerData,
}

impl AnswerRecord {
    pub fn new(name: impl Into<Arc<str>>, ttl: u32, data: AnswerData) -> Self {
        Self {
            name: name.into(),
            ttl,
            data,
        }
    }
}

/// Answers collected for one request, in question order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRecordSet {
    pub answers: Vec<AnswerRecord>,
    /// NetBIOS responses carry no question section.
    pub echo_question: bool,
    /// NetBIOS responses never set the checking-disabled flag.
    pub clear_checking_disabled: bool,
}

impl ReplyRecordSet {
    pub fn new() -> Self {
        Self {
            answers: Vec::new(),
            echo_question: true,
            clear_checking_disabled: false,
        }
    }

    pub fn push(&mut self, record: AnswerRecord) {
        self.answers.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }
}

impl Default for ReplyRecordSet {
    fn default() -> Self {
        Self::new()
    }
}
