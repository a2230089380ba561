//! DNS Message Mapper
//!
//! Translates between `hickory-proto` messages and the relay's domain
//! types: questions coming in, answer sets going out.

use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, NULL};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use linkrelay_domain::query::TYPE_NETBIOS;
use linkrelay_domain::{AnswerData, AnswerRecord, DomainError, Question, ReplyRecordSet};

pub struct MessageMapper;

impl MessageMapper {
    /// Extracts the question section in wire order.
    pub fn questions(message: &Message) -> Vec<Question> {
        message
            .queries()
            .iter()
            .map(|query| Question::new(query.name().to_ascii(), u16::from(query.query_type())))
            .collect()
    }

    /// Starts a response to `request`.
    ///
    /// Copies the transaction id, opcode, RD and CD flags and echoes the
    /// first question, leaving the answer section empty.
    pub fn reply_skeleton(request: &Message) -> Message {
        let mut reply = Message::new();
        reply
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(request.op_code())
            .set_recursion_desired(request.recursion_desired())
            .set_checking_disabled(request.checking_disabled())
            .set_response_code(ResponseCode::NoError);

        if let Some(query) = request.queries().first() {
            reply.add_query(query.clone());
        }

        reply
    }

    /// Builds the full response for a non-empty answer set.
    pub fn reply(request: &Message, records: &ReplyRecordSet) -> Result<Message, DomainError> {
        let mut reply = Self::reply_skeleton(request);

        if records.clear_checking_disabled {
            reply.set_checking_disabled(false);
        }
        if !records.echo_question {
            reply.take_queries();
        }

        for answer in &records.answers {
            reply.add_answer(Self::record(answer)?);
        }

        Ok(reply)
    }

    pub fn record(answer: &AnswerRecord) -> Result<Record, DomainError> {
        let name = Name::from_ascii(&*answer.name)
            .map_err(|e| DomainError::InvalidName(format!("{}: {}", answer.name, e)))?;

        let rdata = match &answer.data {
            AnswerData::A(addr) => RData::A(A(*addr)),
            AnswerData::AAAA(addr) => RData::AAAA(AAAA(*addr)),
            AnswerData::NetBiosLocator(locator) => RData::Unknown {
                code: RecordType::Unknown(TYPE_NETBIOS),
                rdata: NULL::with(locator.clone()),
            },
        };

        Ok(Record::from_rdata(name, answer.ttl, rdata))
    }

    pub fn parse(bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(bytes).map_err(|e| DomainError::MalformedMessage(e.to_string()))
    }

    pub fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message
            .emit(&mut encoder)
            .map_err(|e| DomainError::SerializationFailed(e.to_string()))?;

        Ok(buf)
    }
}
